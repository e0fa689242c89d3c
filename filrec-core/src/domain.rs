// filrec_core/src/domain.rs
use crate::codec::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

pub const STATUS_ACTIVE: &str = "Active";
pub const PAYMENT_CASH: &str = "cash";
pub const CASH_REFERENCE: &str = "CASH.FIL";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub code: String,
    pub name: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// What an upsert did to the customers table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// Transaction fields supplied by the importer; the store assigns id and
/// creation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub voucher_number: String,
    pub date: Date,
    pub vehicle_number: Option<String>,
    pub customer_name: Option<String>,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
    pub description: String,
    pub payment_method: String,
    pub reference: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub fields: NewTransaction,
    pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// `STATE-SERIES / REG`
    pub vehicle_number: String,
    pub state_code: String,
    pub series_code: String,
    pub registration_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStagedFile {
    pub file_name: String,
    pub full_path: String,
    pub size: u64,
    /// Upper-cased, without the dot.
    pub extension: String,
    /// blake3, hex encoded.
    pub digest: String,
    /// zstd-compressed file contents.
    pub payload: Vec<u8>,
    pub lines: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFile {
    pub id: u64,
    pub branch: String,
    pub file: NewStagedFile,
    pub staged_at: OffsetDateTime,
}
