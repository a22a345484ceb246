use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{StatusCode, header};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{GalleryError, Result};
use crate::store::ObjectStore;
use ricah_model::{MediaKind, MediaObject};

/// Managed blob-service object store.
///
/// Thin client over the hosted blob HTTP API: list the store, PUT bytes under
/// a pathname, and delete by URL. The service itself is a black box; only the
/// wire contract below is relied on.
#[derive(Clone)]
pub struct BlobObjectStore {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for BlobObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobObjectStore")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct BlobListResponse {
    blobs: Vec<BlobEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobEntry {
    url: String,
    pathname: String,
    uploaded_at: DateTime<Utc>,
    content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobPutResponse {
    url: String,
    pathname: String,
}

impl BlobObjectStore {
    pub fn new(base_url: Url, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: token.into(),
        }
    }

    fn object_url(&self, name: &str) -> Result<Url> {
        self.base_url.join(name).map_err(|err| {
            GalleryError::Validation(format!("invalid object name {name}: {err}"))
        })
    }
}

#[async_trait]
impl ObjectStore for BlobObjectStore {
    async fn list(&self) -> Result<Vec<MediaObject>> {
        let response = self
            .http
            .get(self.base_url.clone())
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?;

        let listing: BlobListResponse = response.json().await?;
        let objects = listing
            .blobs
            .into_iter()
            .filter_map(|entry| {
                let kind = MediaKind::from_path(&entry.pathname).or_else(|| {
                    entry
                        .content_type
                        .as_deref()
                        .and_then(MediaKind::from_content_type)
                })?;
                Some(MediaObject::new(
                    entry.pathname.clone(),
                    entry.url,
                    kind,
                    entry.pathname,
                    entry.uploaded_at,
                ))
            })
            .collect::<Vec<_>>();

        debug!(count = objects.len(), "listed blob store");
        Ok(objects)
    }

    async fn put(
        &self,
        name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaObject> {
        let Some(kind) = MediaKind::from_path(name)
            .or_else(|| MediaKind::from_content_type(content_type))
        else {
            return Err(GalleryError::Validation(format!(
                "unsupported file type: {name}"
            )));
        };

        let size = bytes.len();
        let response = self
            .http
            .put(self.object_url(name)?)
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?
            .error_for_status()?;

        let created: BlobPutResponse = response.json().await?;
        debug!(pathname = %created.pathname, size, "stored blob");

        Ok(MediaObject::new(
            created.pathname.clone(),
            created.url,
            kind,
            created.pathname,
            Utc::now(),
        ))
    }

    async fn delete(&self, locator: &str) -> Result<()> {
        let response = self
            .http
            .post(self.object_url("delete")?)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "urls": [locator] }))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(GalleryError::NotFound(locator.to_string()));
        }
        response.error_for_status()?;

        debug!(locator = %locator, "deleted blob");
        Ok(())
    }
}
