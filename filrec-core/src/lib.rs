#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod record;

pub mod codec;

pub mod text {
    pub mod encoding;
    pub mod resolver;
}

pub mod container {
    pub mod fields;
    pub mod header;
}

pub mod read {
    pub mod canonical;
    pub mod extract;
    pub mod inspect;
    pub mod strict;
}

pub mod recover;

pub mod domain;
pub mod repo;
pub mod repo_factory;
pub mod repo_fs;
pub mod stats;

pub mod index {
    pub mod inmem;
}

pub mod import;
pub mod stage;

// Re-exports: stable API surface
pub use config::RecoveryConfig;
pub use error::{FilError, Result};
pub use import::{ImportReport, ImportSummary, import_customers, import_dir, import_transactions, import_vehicles};
pub use read::extract::{Extraction, RecordKind, Source, extract};
pub use record::GenericRecord;
pub use repo::{Datastore, StoreParams};
pub use repo_factory::{Backend, open_store};
pub use stage::{discover, stage_files};
