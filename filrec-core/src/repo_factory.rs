use crate::error::Result;
use crate::index::inmem::MemStore;
use crate::repo::{Datastore, StoreParams};
use crate::repo_fs::FsStore;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    #[default]
    Fs,
}

/// Open the datastore for `p.branch` and make sure its schema is current.
pub fn open_store(backend: Backend, p: StoreParams) -> Result<Box<dyn Datastore>> {
    let mut store: Box<dyn Datastore> = match backend {
        Backend::Memory => Box::new(MemStore::new(p.branch)),
        Backend::Fs => Box::new(FsStore::open(p)?),
    };
    store.ensure_schema()?;
    Ok(store)
}
