use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MediaId, MediaKind};

/// One stored image or video as the object store reports it.
///
/// Owned by the store; the application only ever holds these transiently for
/// the duration of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaObject {
    /// Unique, stable for the object's lifetime.
    pub id: MediaId,
    /// Locator the object can be fetched from.
    pub src: String,
    pub kind: MediaKind,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl MediaObject {
    pub fn new(
        id: impl Into<MediaId>,
        src: impl Into<String>,
        kind: MediaKind,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            kind,
            name: name.into(),
            created_at,
        }
    }
}
