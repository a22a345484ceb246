use serde::{Deserialize, Serialize};

/// Strongly typed identifier for a stored media object.
///
/// The id is the object's name as the backing store reports it, so it stays
/// stable for the object's lifetime and survives re-listing.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MediaId(pub String);

impl MediaId {
    pub fn new(id: impl Into<String>) -> Self {
        MediaId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for MediaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for MediaId {
    fn from(value: String) -> Self {
        MediaId(value)
    }
}

impl From<&str> for MediaId {
    fn from(value: &str) -> Self {
        MediaId(value.to_string())
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
