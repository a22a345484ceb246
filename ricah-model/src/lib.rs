//! Core data model definitions shared across Ricah crates.
#![allow(missing_docs)]

pub mod error;
pub mod ids;
pub mod media;
pub mod media_kind;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use ids::MediaId;
pub use media::MediaObject;
pub use media_kind::MediaKind;
