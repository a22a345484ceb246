//! Object-store port and its adapters.

pub mod blob;
pub mod fs;

use async_trait::async_trait;

use crate::error::Result;
use ricah_model::MediaObject;

pub use blob::BlobObjectStore;
pub use fs::FsObjectStore;

/// Port over the backing object store. The store is the source of truth for
/// which media objects exist; the gallery holds no independent copy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Enumerate the stored media objects. Files of kinds the gallery does
    /// not accept are not reported.
    async fn list(&self) -> Result<Vec<MediaObject>>;

    /// Store `bytes` under `name` and return the created object.
    async fn put(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaObject>;

    /// Delete the object addressed by `locator`. Unknown locators surface as
    /// [`crate::GalleryError::NotFound`].
    async fn delete(&self, locator: &str) -> Result<()>;
}
