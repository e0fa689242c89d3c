//! Turns decoded records into customers, transactions and vehicles.

pub mod customers;
pub mod run;
pub mod transactions;
pub mod vehicles;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use customers::import_customers;
pub use run::{ImportSummary, import_dir};
pub use transactions::import_transactions;
pub use vehicles::{import_vehicles, parse_daybook_vehicle};

/// Per-run outcome of one importer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Records (or lines) looked at.
    pub seen: u64,
    /// `inserted + updated`.
    pub imported: u64,
    pub inserted: u64,
    pub updated: u64,
    /// Filtered out before reaching the store.
    pub rejected: u64,
    /// Refused by the store.
    pub failed: u64,
}

impl ImportReport {
    fn count_insert(&mut self) {
        self.inserted += 1;
        self.imported += 1;
    }

    fn count_update(&mut self) {
        self.updated += 1;
        self.imported += 1;
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} imported ({} new, {} updated), {} rejected, {} failed of {} seen",
            self.imported, self.inserted, self.updated, self.rejected, self.failed, self.seen
        )
    }
}

/// Trim and squeeze every whitespace run to one space.
pub fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
