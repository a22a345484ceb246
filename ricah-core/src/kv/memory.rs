use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{GalleryError, Result};
use crate::kv::{OrderStore, VersionedOrder};
use ricah_model::MediaId;

/// In-process order store, used when no Redis is configured and by tests.
/// The record does not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    record: Mutex<Option<VersionedOrder>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already-written record at revision 1.
    pub fn seeded(ids: Vec<MediaId>) -> Self {
        Self {
            record: Mutex::new(Some(VersionedOrder { ids, revision: 1 })),
        }
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn fetch(&self) -> Result<Option<VersionedOrder>> {
        Ok(self.record.lock().await.clone())
    }

    async fn save(
        &self,
        ids: &[MediaId],
        expected: Option<u64>,
    ) -> Result<u64> {
        let mut record = self.record.lock().await;
        let current = record.as_ref().map(|r| r.revision).unwrap_or(0);

        if let Some(expected) = expected
            && expected != current
        {
            return Err(GalleryError::RevisionConflict {
                expected,
                actual: current,
            });
        }

        let revision = current + 1;
        *record = Some(VersionedOrder {
            ids: ids.to_vec(),
            revision,
        });
        Ok(revision)
    }
}
