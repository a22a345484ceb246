use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order backend error: {0}")]
    OrderBackend(#[from] redis::RedisError),

    #[error("Object store error: {0}")]
    StoreBackend(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Media not found: {0}")]
    NotFound(String),

    #[error("Stale order revision: expected {expected}, found {actual}")]
    RevisionConflict { expected: u64, actual: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ricah_model::ModelError> for GalleryError {
    fn from(err: ricah_model::ModelError) -> Self {
        GalleryError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
