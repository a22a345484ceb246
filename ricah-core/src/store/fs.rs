use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{GalleryError, Result};
use crate::store::ObjectStore;
use ricah_model::{MediaKind, MediaObject};

/// Local-directory object store.
///
/// Objects are plain files under `root`; the object id is the file name and
/// the creation timestamp is the file's mtime. Locators are served under
/// `/media/{name}` by the HTTP layer.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

/// URL prefix the server mounts the media directory under.
pub const FS_PUBLIC_BASE: &str = "/media";

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locator_for(name: &str) -> String {
        format!("{FS_PUBLIC_BASE}/{name}")
    }

    /// Strip the serving prefix off a locator, rejecting anything that is not
    /// a bare file name underneath it.
    fn name_from_locator(locator: &str) -> Result<&str> {
        let name = locator
            .strip_prefix(FS_PUBLIC_BASE)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(locator);
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(GalleryError::Validation(format!(
                "invalid media locator: {locator}"
            )));
        }
        Ok(name)
    }

    /// Reduce an uploaded file name to a safe bare name.
    fn sanitize_name(name: &str) -> Result<String> {
        let bare = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if bare.is_empty() || bare == "." || bare == ".." {
            return Err(GalleryError::Validation(format!(
                "invalid upload name: {name}"
            )));
        }
        Ok(bare.to_string())
    }

    /// Insert a short random suffix before the extension so an upload never
    /// overwrites an existing object.
    fn deduplicate_name(name: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        let short = &suffix[..8];
        match name.rsplit_once('.') {
            Some((stem, ext)) => format!("{stem}-{short}.{ext}"),
            None => format!("{name}-{short}"),
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn list(&self) -> Result<Vec<MediaObject>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut objects = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            let Some(kind) = MediaKind::from_path(&name) else {
                continue;
            };
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let created_at: DateTime<Utc> = meta.modified()?.into();

            objects.push(MediaObject::new(
                name.clone(),
                Self::locator_for(&name),
                kind,
                name,
                created_at,
            ));
        }

        debug!(count = objects.len(), "listed media directory");
        Ok(objects)
    }

    async fn put(
        &self,
        name: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<MediaObject> {
        let mut bare = Self::sanitize_name(name)?;
        let Some(kind) = MediaKind::from_path(&bare) else {
            return Err(GalleryError::Validation(format!(
                "unsupported file type: {name}"
            )));
        };

        tokio::fs::create_dir_all(&self.root).await?;
        if tokio::fs::try_exists(self.root.join(&bare)).await? {
            bare = Self::deduplicate_name(&bare);
        }

        let path = self.root.join(&bare);
        tokio::fs::write(&path, &bytes).await?;
        debug!(name = %bare, size = bytes.len(), "stored media file");

        Ok(MediaObject::new(
            bare.clone(),
            Self::locator_for(&bare),
            kind,
            bare,
            Utc::now(),
        ))
    }

    async fn delete(&self, locator: &str) -> Result<()> {
        let name = Self::name_from_locator(locator)?;
        let path = self.root.join(name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(name = %name, "deleted media file");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(GalleryError::NotFound(locator.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_list_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let stored = store
            .put("sunset.jpg", "image/jpeg", b"fake-jpeg".to_vec())
            .await
            .unwrap();
        assert_eq!(stored.kind, MediaKind::Image);
        assert_eq!(stored.src, "/media/sunset.jpg");

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, stored.id);

        store.delete(&stored.src).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_skips_unaccepted_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"v").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"t").unwrap();

        let store = FsObjectStore::new(dir.path());
        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind, MediaKind::Video);
    }

    #[tokio::test]
    async fn colliding_upload_gets_a_fresh_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let first = store
            .put("photo.png", "image/png", b"one".to_vec())
            .await
            .unwrap();
        let second = store
            .put("photo.png", "image/png", b"two".to_vec())
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_of_unknown_locator_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let err = store.delete("/media/ghost.jpg").await.unwrap_err();
        assert!(matches!(err, GalleryError::NotFound(_)));
    }

    #[tokio::test]
    async fn traversal_locators_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let err = store.delete("/media/../etc/passwd").await.unwrap_err();
        assert!(matches!(err, GalleryError::Validation(_)));
    }

    #[tokio::test]
    async fn unsupported_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let err = store
            .put("malware.exe", "application/octet-stream", b"x".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::Validation(_)));
    }
}
