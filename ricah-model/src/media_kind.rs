use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// File extensions the gallery accepts, image extensions first.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "mp4"];

/// Simple enum for gallery media kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image media kind
    Image,
    /// Video media kind
    Video,
}

impl MediaKind {
    /// Derive the kind from a file path's extension. Returns `None` for
    /// extensions the gallery does not accept.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())?;
        match ext.as_str() {
            "jpg" | "jpeg" | "png" => Some(MediaKind::Image),
            "mp4" => Some(MediaKind::Video),
            _ => None,
        }
    }

    /// Derive the kind from a MIME type, e.g. `image/png` or `video/mp4`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if content_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            other => Err(ModelError::UnsupportedMedia(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_path() {
        assert_eq!(MediaKind::from_path("a/sunset.JPG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_path("clip.mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_path("notes.txt"), None);
        assert_eq!(MediaKind::from_path("no_extension"), None);
    }

    #[test]
    fn kind_from_content_type() {
        assert_eq!(
            MediaKind::from_content_type("image/jpeg"),
            Some(MediaKind::Image)
        );
        assert_eq!(
            MediaKind::from_content_type("video/mp4"),
            Some(MediaKind::Video)
        );
        assert_eq!(MediaKind::from_content_type("application/pdf"), None);
    }
}
