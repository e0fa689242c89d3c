use serde::{Deserialize, Serialize};

/// Row counts of one branch's datastore.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub customers: u64,
    pub transactions: u64,
    pub vehicles: u64,
    pub staged_files: u64,
}
