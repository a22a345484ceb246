pub mod sources;

use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Runtime configuration for the Ricah server.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub redis: Option<RedisConfig>,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
    pub proxy: ProxyConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        if self.storage.method == StorageMethod::Filesystem {
            std::fs::create_dir_all(&self.storage.media_root)?;
        }
        Ok(())
    }

    pub fn media_root(&self) -> &Path {
        &self.storage.media_root
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which object-store adapter backs the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMethod {
    /// Local directory under `storage.media_root`, served at `/media`.
    Filesystem,
    /// Hosted blob service reached over HTTP.
    Blob,
}

impl FromStr for StorageMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "filesystem" | "fs" => Ok(StorageMethod::Filesystem),
            "blob" => Ok(StorageMethod::Blob),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub method: StorageMethod,
    pub media_root: PathBuf,
    pub blob: Option<BlobConfig>,
}

#[derive(Debug, Clone)]
pub struct BlobConfig {
    pub base_url: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Hard cap on an uploaded file's size in bytes.
    pub max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// `max-age` the proxy endpoint advertises on relayed bytes, in seconds.
    pub cache_max_age: u64,
}

#[derive(Debug, Clone)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        Self {
            config_path: None,
            env_file_loaded: false,
        }
    }
}
