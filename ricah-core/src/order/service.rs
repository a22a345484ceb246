use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{GalleryError, Result};
use crate::kv::{OrderStore, VersionedOrder};
use crate::order::sequence;
use crate::store::ObjectStore;
use ricah_model::{MediaId, MediaObject};

/// Request-scoped façade over the two ports: computes the display sequence
/// and applies the three order mutations (append on upload, removal on
/// delete, wholesale replace on manual reorder).
#[derive(Clone)]
pub struct OrderService {
    objects: Arc<dyn ObjectStore>,
    orders: Arc<dyn OrderStore>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService").finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self { objects, orders }
    }

    /// The public feed: persisted order first, then unlisted objects newest
    /// first. An unreachable order backend degrades to the recency fallback
    /// rather than failing the read.
    pub async fn feed(&self) -> Result<Vec<MediaObject>> {
        let objects = self.objects.list().await?;
        let order = match self.orders.fetch().await {
            Ok(Some(record)) => record.ids,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "order list unavailable, serving recency fallback");
                Vec::new()
            }
        };
        Ok(sequence::display_sequence(objects, &order))
    }

    /// Transient random view: a fresh permutation per call, never persisted.
    pub async fn random_feed(&self) -> Result<Vec<MediaObject>> {
        let objects = self.objects.list().await?;
        Ok(sequence::shuffled(objects))
    }

    /// The persisted order record; an empty revision-0 record when absent.
    pub async fn current_order(&self) -> Result<VersionedOrder> {
        Ok(self.orders.fetch().await?.unwrap_or_default())
    }

    /// Store an upload and append its id to the order list.
    pub async fn upload(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaObject> {
        let object = self.objects.put(name, content_type, bytes).await?;
        let revision = self.record_upload(&object.id).await?;
        info!(id = %object.id, revision, "media uploaded");
        Ok(object)
    }

    /// Delete the object addressed by `locator` and drop its id from the
    /// order list. An unknown locator fails without touching the list.
    pub async fn delete(&self, locator: &str) -> Result<()> {
        let listing = self.objects.list().await?;
        let Some(object) = listing.into_iter().find(|o| o.src == locator)
        else {
            return Err(GalleryError::NotFound(locator.to_string()));
        };

        self.objects.delete(locator).await?;
        let revision = self.record_delete(&object.id).await?;
        info!(id = %object.id, revision, "media deleted");
        Ok(())
    }

    /// Replace the order list wholesale. `expected` carries the revision the
    /// caller read; `None` keeps last-writer-wins.
    pub async fn replace(
        &self,
        ids: Vec<MediaId>,
        expected: Option<u64>,
    ) -> Result<u64> {
        let revision = self.orders.save(&ids, expected).await?;
        info!(len = ids.len(), revision, "order replaced");
        Ok(revision)
    }

    async fn record_upload(&self, id: &MediaId) -> Result<u64> {
        let current = self.orders.fetch().await?.unwrap_or_default();
        let ids = sequence::append(current.ids, id.clone());
        self.orders.save(&ids, Some(current.revision)).await
    }

    async fn record_delete(&self, id: &MediaId) -> Result<u64> {
        let Some(current) = self.orders.fetch().await? else {
            return Ok(0);
        };
        if !current.ids.contains(id) {
            debug!(id = %id, "deleted id was not listed, order untouched");
            return Ok(current.revision);
        }
        let ids = sequence::remove(current.ids, id);
        self.orders.save(&ids, Some(current.revision)).await
    }
}
