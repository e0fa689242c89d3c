use super::vehicles::DAYBOOK_FILES;
use super::{ImportReport, import_customers, import_transactions, import_vehicles};
use crate::config::RecoveryConfig;
use crate::error::Result;
use crate::read::extract::{RecordKind, Source, extract};
use crate::repo::Datastore;
use crate::stage::{LEGACY_FILES, discover, stage_files};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::{info, info_span, warn};

/// Everything one directory import did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub staged: usize,
    pub customers: ImportReport,
    pub customers_source: Option<Source>,
    pub transactions: ImportReport,
    pub transactions_source: Option<Source>,
    pub vehicles: ImportReport,
}

/// Where the newest staged copy of `name` lives, if it is still there.
fn staged_path(store: &dyn Datastore, name: &str) -> Result<Option<PathBuf>> {
    Ok(store
        .latest_staged(name)?
        .map(|s| PathBuf::from(s.file.full_path))
        .filter(|p| p.is_file()))
}

/// Stage the legacy files of `dir`, then import customers from
/// `ACCOUNT.FIL`, cash transactions from `CASH.FIL` and vehicles from the
/// day-book printouts. A missing file skips its importer.
pub fn import_dir(
    store: &mut dyn Datastore,
    dir: &Path,
    config: &RecoveryConfig,
    now: OffsetDateTime,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let paths = discover(dir, &LEGACY_FILES)?;
    summary.staged = stage_files(store, &paths, config, now);

    if let Some(p) = staged_path(store, "ACCOUNT.FIL")? {
        let _file = info_span!("import", file = %p.display()).entered();
        match extract(&p, RecordKind::Account, config) {
            Ok(ex) => {
                summary.customers_source = Some(ex.source());
                summary.customers = import_customers(store, ex, now);
            }
            Err(e) => warn!(path = %p.display(), error = %e, "account file unreadable"),
        }
    } else {
        warn!(dir = %dir.display(), "ACCOUNT.FIL not staged; skipping customers");
    }

    if let Some(p) = staged_path(store, "CASH.FIL")? {
        let _file = info_span!("import", file = %p.display()).entered();
        match extract(&p, RecordKind::Cash, config) {
            Ok(ex) => {
                summary.transactions_source = Some(ex.source());
                summary.transactions = import_transactions(store, ex, now);
            }
            Err(e) => warn!(path = %p.display(), error = %e, "cash file unreadable"),
        }
    } else {
        warn!(dir = %dir.display(), "CASH.FIL not staged; skipping transactions");
    }

    let mut lines = Vec::new();
    for name in DAYBOOK_FILES {
        if let Some(staged) = store.latest_staged(name)? {
            lines.extend(staged.file.lines.unwrap_or_default());
        }
    }
    if lines.is_empty() {
        info!("no day-book text staged; skipping vehicles");
    } else {
        let _file = info_span!("import", file = "day-book").entered();
        summary.vehicles = import_vehicles(store, lines);
    }

    store.flush()?;
    Ok(summary)
}
