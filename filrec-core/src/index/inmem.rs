use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{
    Customer, NewStagedFile, NewTransaction, STATUS_ACTIVE, StagedFile, Transaction, Upsert,
    Vehicle,
};
use crate::error::{FilError, Result};
use crate::repo::Datastore;
use crate::stats::Counts;

/// All rows of one branch. Serialized as-is by the snapshot store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Tables {
    pub schema_version: u32,
    pub customers: BTreeMap<String, Customer>,
    pub transactions: Vec<Transaction>,
    pub vouchers: BTreeSet<String>,
    /// Keyed by upper-cased vehicle number.
    pub vehicles: BTreeMap<String, Vehicle>,
    pub staged: Vec<StagedFile>,
    pub last_voucher: u64,
    pub next_id: u64,
}

pub const SCHEMA_VERSION: u32 = 1;

impl Tables {
    fn take_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn ensure_schema(&mut self) -> Result<()> {
        match self.schema_version {
            0 => {
                self.schema_version = SCHEMA_VERSION;
                Ok(())
            }
            SCHEMA_VERSION => Ok(()),
            v => Err(FilError::Persistence(format!(
                "unsupported schema version {v} (expected {SCHEMA_VERSION})"
            ))),
        }
    }

    pub fn upsert_customer(&mut self, code: &str, name: &str, now: OffsetDateTime) -> Result<Upsert> {
        if code.is_empty() || name.is_empty() {
            return Err(FilError::Persistence("customer code and name are required".into()));
        }
        if let Some(c) = self.customers.get_mut(code) {
            c.name = name.to_string();
            c.updated_at = now;
            return Ok(Upsert::Updated);
        }
        let id = self.take_id();
        self.customers.insert(
            code.to_string(),
            Customer {
                id,
                code: code.to_string(),
                name: name.to_string(),
                status: STATUS_ACTIVE.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(Upsert::Inserted)
    }

    pub fn create_transaction(&mut self, tx: NewTransaction, now: OffsetDateTime) -> Result<u64> {
        if tx.voucher_number.is_empty() {
            return Err(FilError::Persistence("voucher number is required".into()));
        }
        if !self.vouchers.insert(tx.voucher_number.clone()) {
            return Err(FilError::Persistence(format!(
                "voucher number {} already exists",
                tx.voucher_number
            )));
        }
        let id = self.take_id();
        self.transactions.push(Transaction {
            id,
            fields: tx,
            created_at: now,
        });
        Ok(id)
    }

    pub fn next_voucher_number(&mut self) -> u64 {
        self.last_voucher += 1;
        self.last_voucher
    }

    pub fn insert_vehicle_if_absent(&mut self, v: Vehicle) -> bool {
        let key = v.vehicle_number.to_ascii_uppercase();
        if self.vehicles.contains_key(&key) {
            return false;
        }
        self.vehicles.insert(key, v);
        true
    }

    pub fn record_staged_file(
        &mut self,
        branch: &str,
        f: NewStagedFile,
        now: OffsetDateTime,
    ) -> u64 {
        let id = self.take_id();
        self.staged.push(StagedFile {
            id,
            branch: branch.to_string(),
            file: f,
            staged_at: now,
        });
        id
    }

    pub fn latest_staged(&self, file_name: &str) -> Option<StagedFile> {
        // ids only grow, so the last match is the newest
        self.staged
            .iter()
            .rev()
            .find(|s| s.file.file_name.eq_ignore_ascii_case(file_name))
            .cloned()
    }

    pub fn counts(&self) -> Counts {
        Counts {
            customers: self.customers.len() as u64,
            transactions: self.transactions.len() as u64,
            vehicles: self.vehicles.len() as u64,
            staged_files: self.staged.len() as u64,
        }
    }
}

/// Volatile backend; everything is lost on drop.
#[derive(Debug)]
pub struct MemStore {
    branch: String,
    tables: Tables,
}

impl MemStore {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            tables: Tables::default(),
        }
    }
}

impl Datastore for MemStore {
    fn branch(&self) -> &str {
        &self.branch
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.tables.ensure_schema()
    }

    fn upsert_customer(&mut self, code: &str, name: &str, now: OffsetDateTime) -> Result<Upsert> {
        self.tables.upsert_customer(code, name, now)
    }

    fn create_transaction(&mut self, tx: NewTransaction, now: OffsetDateTime) -> Result<u64> {
        self.tables.create_transaction(tx, now)
    }

    fn next_voucher_number(&mut self) -> Result<u64> {
        Ok(self.tables.next_voucher_number())
    }

    fn insert_vehicle_if_absent(&mut self, v: Vehicle) -> Result<bool> {
        Ok(self.tables.insert_vehicle_if_absent(v))
    }

    fn record_staged_file(&mut self, f: NewStagedFile, now: OffsetDateTime) -> Result<u64> {
        Ok(self.tables.record_staged_file(&self.branch, f, now))
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Decimal;
    use time::macros::{date, datetime};

    fn tx(voucher: &str) -> NewTransaction {
        NewTransaction {
            voucher_number: voucher.into(),
            date: date!(2023 - 01 - 15),
            vehicle_number: None,
            customer_name: None,
            debit: Decimal::zero(2),
            credit: Decimal::new(100, 2),
            balance: Decimal::zero(2),
            description: "x".into(),
            payment_method: "cash".into(),
            reference: "CASH.FIL".into(),
        }
    }

    #[test]
    fn upsert_inserts_then_updates() {
        let t0 = datetime!(2024-01-01 0:00 UTC);
        let t1 = datetime!(2024-02-01 0:00 UTC);
        let mut s = MemStore::new("main");
        s.ensure_schema().unwrap();
        assert_eq!(s.upsert_customer("5494", "UHA", t0).unwrap(), Upsert::Inserted);
        assert_eq!(s.upsert_customer("5494", "UHA LTD", t1).unwrap(), Upsert::Updated);
        let cs = s.customers().unwrap();
        assert_eq!(cs.len(), 1);
        assert_eq!(cs[0].name, "UHA LTD");
        assert_eq!(cs[0].status, STATUS_ACTIVE);
        assert_eq!(cs[0].created_at, t0);
        assert_eq!(cs[0].updated_at, t1);
    }

    #[test]
    fn duplicate_voucher_is_a_persistence_error() {
        let now = datetime!(2024-01-01 0:00 UTC);
        let mut s = MemStore::new("main");
        s.create_transaction(tx("1"), now).unwrap();
        let err = s.create_transaction(tx("1"), now).unwrap_err();
        assert!(matches!(err, FilError::Persistence(_)));
        assert_eq!(s.counts().unwrap().transactions, 1);
    }

    #[test]
    fn voucher_counter_and_vehicle_uniqueness() {
        let mut s = MemStore::new("main");
        assert_eq!(s.next_voucher_number().unwrap(), 1);
        assert_eq!(s.next_voucher_number().unwrap(), 2);

        let v = Vehicle {
            vehicle_number: "CG-04 / 1234".into(),
            state_code: "CG".into(),
            series_code: "04".into(),
            registration_number: "1234".into(),
        };
        assert!(s.insert_vehicle_if_absent(v.clone()).unwrap());
        let lower = Vehicle {
            vehicle_number: "cg-04 / 1234".into(),
            ..v
        };
        assert!(!s.insert_vehicle_if_absent(lower).unwrap());
        assert_eq!(s.counts().unwrap().vehicles, 1);
    }

    #[test]
    fn newer_schema_is_refused() {
        let mut t = Tables {
            schema_version: SCHEMA_VERSION + 1,
            ..Tables::default()
        };
        assert!(t.ensure_schema().is_err());
    }
}
