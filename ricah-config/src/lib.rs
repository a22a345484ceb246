//! Shared configuration library for Ricah.
//!
//! This crate centralizes config loading and validation for the server
//! binary: defaults, an optional TOML file, `.env` support, and environment
//! overrides all merge into one plain [`Config`] with non-fatal warnings for
//! suspicious but workable setups.

pub mod loader;
pub mod models;
pub mod util;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigWarning, ConfigWarnings,
};
pub use models::{
    BlobConfig, Config, ConfigMetadata, CorsConfig, ProxyConfig, RedisConfig,
    ServerConfig, StorageConfig, StorageMethod, UploadConfig,
};
