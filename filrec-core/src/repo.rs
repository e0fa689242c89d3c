// filrec_core/src/repo.rs
use crate::domain::{Customer, NewStagedFile, NewTransaction, StagedFile, Transaction, Upsert, Vehicle};
use crate::error::Result;
use crate::stats::Counts;
use std::path::PathBuf;
use time::OffsetDateTime;

pub const DEFAULT_BRANCH: &str = "main";

#[derive(Clone, Debug)]
pub struct StoreParams {
    /// Directory holding one snapshot per branch; ignored by the memory backend.
    pub root: PathBuf,
    pub branch: String,
}

/// Persistence seam for one branch. Uniqueness of customer codes, voucher
/// numbers and vehicle numbers is the store's job.
pub trait Datastore {
    fn branch(&self) -> &str;

    fn ensure_schema(&mut self) -> Result<()>;

    /// Insert by code, or update name and `updated_at` of the existing row.
    fn upsert_customer(&mut self, code: &str, name: &str, now: OffsetDateTime) -> Result<Upsert>;

    /// Fails with `Persistence` when the voucher number is already taken.
    fn create_transaction(&mut self, tx: NewTransaction, now: OffsetDateTime) -> Result<u64>;

    /// Last issued voucher number plus one; the counter advances on each call.
    fn next_voucher_number(&mut self) -> Result<u64>;

    /// Returns false when a vehicle with that number already exists.
    fn insert_vehicle_if_absent(&mut self, v: Vehicle) -> Result<bool>;

    fn record_staged_file(&mut self, f: NewStagedFile, now: OffsetDateTime) -> Result<u64>;

    /// Newest staged record for `file_name`, compared case-insensitively.
    fn latest_staged(&self, file_name: &str) -> Result<Option<StagedFile>>;

    fn customers(&self) -> Result<Vec<Customer>>;

    fn transactions(&self) -> Result<Vec<Transaction>>;

    fn vehicles(&self) -> Result<Vec<Vehicle>>;

    fn counts(&self) -> Result<Counts>;

    /// Make pending changes durable.
    fn flush(&mut self) -> Result<()>;
}
