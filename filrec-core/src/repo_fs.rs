use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::debug;

use crate::domain::{Customer, NewStagedFile, NewTransaction, StagedFile, Transaction, Upsert, Vehicle};
use crate::error::{FilError, Result};
use crate::index::inmem::Tables;
use crate::repo::{Datastore, StoreParams};
use crate::stats::Counts;

pub const SNAPSHOT_EXT: &str = "cbor";

/// One CBOR snapshot per branch under `root`. Changes live in memory until
/// `flush`, which replaces the snapshot atomically.
pub struct FsStore {
    branch: String,
    path: PathBuf,
    tables: Tables,
    dirty: bool,
}

pub fn snapshot_path(root: &Path, branch: &str) -> Result<PathBuf> {
    let ok = !branch.is_empty()
        && branch
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(FilError::Config(format!("invalid branch name `{branch}`")));
    }
    Ok(root.join(format!("{branch}.{SNAPSHOT_EXT}")))
}

impl FsStore {
    pub fn open(params: StoreParams) -> Result<Self> {
        let path = snapshot_path(&params.root, &params.branch)?;
        fs::create_dir_all(&params.root)?;
        let tables = match File::open(&path) {
            Ok(f) => ciborium::de::from_reader(BufReader::new(f)).map_err(|e| {
                FilError::Persistence(format!("snapshot {} unreadable: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Tables::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), "snapshot opened");
        Ok(Self {
            branch: params.branch,
            path,
            tables,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn touch<T>(&mut self, r: T) -> T {
        self.dirty = true;
        r
    }
}

impl Datastore for FsStore {
    fn branch(&self) -> &str {
        &self.branch
    }

    fn ensure_schema(&mut self) -> Result<()> {
        let before = self.tables.schema_version;
        self.tables.ensure_schema()?;
        if before != self.tables.schema_version {
            self.dirty = true;
        }
        Ok(())
    }

    fn upsert_customer(&mut self, code: &str, name: &str, now: OffsetDateTime) -> Result<Upsert> {
        let r = self.tables.upsert_customer(code, name, now)?;
        Ok(self.touch(r))
    }

    fn create_transaction(&mut self, tx: NewTransaction, now: OffsetDateTime) -> Result<u64> {
        let r = self.tables.create_transaction(tx, now)?;
        Ok(self.touch(r))
    }

    fn next_voucher_number(&mut self) -> Result<u64> {
        let r = self.tables.next_voucher_number();
        Ok(self.touch(r))
    }

    fn insert_vehicle_if_absent(&mut self, v: Vehicle) -> Result<bool> {
        let inserted = self.tables.insert_vehicle_if_absent(v);
        if inserted {
            self.dirty = true;
        }
        Ok(inserted)
    }

    fn record_staged_file(&mut self, f: NewStagedFile, now: OffsetDateTime) -> Result<u64> {
        let r = self.tables.record_staged_file(&self.branch, f, now);
        Ok(self.touch(r))
    }

    fn latest_staged(&self, file_name: &str) -> Result<Option<StagedFile>> {
        Ok(self.tables.latest_staged(file_name))
    }

    fn customers(&self) -> Result<Vec<Customer>> {
        Ok(self.tables.customers.values().cloned().collect())
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.tables.transactions.clone())
    }

    fn vehicles(&self) -> Result<Vec<Vehicle>> {
        Ok(self.tables.vehicles.values().cloned().collect())
    }

    fn counts(&self) -> Result<Counts> {
        Ok(self.tables.counts())
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let tmp = self.path.with_extension(format!("{SNAPSHOT_EXT}.tmp"));
        {
            let mut w = BufWriter::new(File::create(&tmp)?);
            ciborium::ser::into_writer(&self.tables, &mut w)
                .map_err(|e| FilError::Persistence(format!("snapshot encode: {e}")))?;
            w.flush()?;
            w.get_ref().sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        self.dirty = false;
        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

impl Drop for FsStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::warn!(path = %self.path.display(), "store dropped with unflushed changes");
        }
    }
}
