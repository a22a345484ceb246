//! Order-list persistence.
//!
//! The order list is one record in a key-value store. It carries a revision
//! token so concurrent writers cannot silently clobber each other: a save
//! that names a revision is rejected unless the stored record is still at
//! that revision.

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use ricah_model::MediaId;

pub use memory::MemoryOrderStore;
pub use redis::RedisOrderStore;

/// The persisted order list plus its revision token. Revision 0 means the
/// record has never been written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionedOrder {
    pub ids: Vec<MediaId>,
    pub revision: u64,
}

/// Port over the key-value store holding the order record.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Read the current record, or `None` if it was never written.
    async fn fetch(&self) -> Result<Option<VersionedOrder>>;

    /// Write `ids` and return the new revision.
    ///
    /// With `expected` set, the write only succeeds while the stored record
    /// is still at that revision; a stale `expected` fails with
    /// [`crate::GalleryError::RevisionConflict`] and leaves the record
    /// untouched. `None` writes unconditionally (last writer wins).
    async fn save(&self, ids: &[MediaId], expected: Option<u64>)
    -> Result<u64>;
}
