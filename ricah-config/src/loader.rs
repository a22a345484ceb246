use std::path::PathBuf;

use thiserror::Error;

use crate::models::sources::{EnvConfig, FileConfig};
use crate::models::{
    BlobConfig, Config, ConfigMetadata, CorsConfig, ProxyConfig, RedisConfig,
    ServerConfig, StorageConfig, StorageMethod, UploadConfig,
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3900;
const DEFAULT_MEDIA_ROOT: &str = "public/media";
const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_PROXY_CACHE_MAX_AGE: u64 = 31_536_000;
const DEFAULT_CONFIG_FILE: &str = "ricah.toml";

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },

    #[error("unknown storage method: {0}")]
    UnknownStorageMethod(String),

    #[error(
        "blob storage selected but BLOB_READ_WRITE_TOKEN is not configured"
    )]
    MissingBlobToken,
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push(&mut self, message: impl Into<String>, hint: Option<&str>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: hint.map(|h| h.to_string()),
        });
    }
}

/// A loaded configuration plus any non-fatal findings.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

/// Merges defaults, an optional TOML file, `.env`, and environment
/// variables. Environment values win over the file; the file wins over
/// defaults.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = dotenvy::dotenv().is_ok();

        let config_path = self.resolve_config_path();
        let file = match &config_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| {
                    ConfigLoadError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                toml::from_str::<FileConfig>(&raw).map_err(|source| {
                    ConfigLoadError::Parse {
                        path: path.clone(),
                        source: Box::new(source),
                    }
                })?
            }
            None => FileConfig::default(),
        };
        let env = EnvConfig::gather();

        let mut warnings = ConfigWarnings::default();
        let config =
            self.merge(file, env, config_path, env_file_loaded, &mut warnings)?;

        Ok(ConfigLoad { config, warnings })
    }

    fn resolve_config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        if let Ok(path) = std::env::var("RICAH_CONFIG") {
            return Some(PathBuf::from(path));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.is_file().then_some(default)
    }

    fn merge(
        &self,
        file: FileConfig,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
        warnings: &mut ConfigWarnings,
    ) -> Result<Config, ConfigLoadError> {
        let server = ServerConfig {
            host: env
                .server_host
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env.server_port.or(file.server.port).unwrap_or(DEFAULT_PORT),
        };

        let method = match env.storage_method.or(file.storage.method) {
            Some(raw) => raw
                .parse::<StorageMethod>()
                .map_err(ConfigLoadError::UnknownStorageMethod)?,
            None => StorageMethod::Filesystem,
        };

        let blob_base_url = env.blob_base_url.or(file.storage.blob_base_url);
        let blob_token = env.blob_token.or(file.storage.blob_token);
        let blob = match (method, blob_base_url, blob_token) {
            (StorageMethod::Blob, Some(base_url), Some(token)) => {
                Some(BlobConfig { base_url, token })
            }
            (StorageMethod::Blob, _, None) => {
                return Err(ConfigLoadError::MissingBlobToken);
            }
            (StorageMethod::Blob, None, Some(token)) => Some(BlobConfig {
                base_url: "https://blob.vercel-storage.com/".to_string(),
                token,
            }),
            (StorageMethod::Filesystem, _, _) => None,
        };

        let storage = StorageConfig {
            method,
            media_root: env
                .media_root
                .or(file.storage.media_root)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT)),
            blob,
        };

        let redis = env
            .redis_url
            .map(|url| RedisConfig { url })
            .or(file.redis.map(|r| RedisConfig { url: r.url }));
        if redis.is_none() {
            warnings.push(
                "no Redis configured; the media order will not survive a restart",
                Some("set REDIS_URL or add a [redis] section"),
            );
        }

        let cors = CorsConfig {
            allowed_origins: env
                .cors_allowed_origins
                .or(file.cors.allowed_origins)
                .unwrap_or_default(),
            allowed_methods: env
                .cors_allowed_methods
                .or(file.cors.allowed_methods)
                .unwrap_or_else(|| {
                    ["GET", "POST", "DELETE"]
                        .iter()
                        .map(|m| m.to_string())
                        .collect()
                }),
            allowed_headers: env
                .cors_allowed_headers
                .or(file.cors.allowed_headers)
                .unwrap_or_else(|| vec!["content-type".to_string()]),
            allow_credentials: env
                .cors_allow_credentials
                .or(file.cors.allow_credentials)
                .unwrap_or(false),
        };
        if cors.is_wildcard_included() && cors.allow_credentials {
            warnings.push(
                "CORS allows credentials together with a wildcard origin",
                Some("list explicit origins or drop allow_credentials"),
            );
        }

        let upload = UploadConfig {
            max_bytes: env
                .upload_max_bytes
                .or(file.upload.max_bytes)
                .unwrap_or(DEFAULT_UPLOAD_MAX_BYTES),
        };

        let proxy = ProxyConfig {
            cache_max_age: env
                .proxy_cache_max_age
                .or(file.proxy.cache_max_age)
                .unwrap_or(DEFAULT_PROXY_CACHE_MAX_AGE),
        };

        let dev_mode =
            env.dev_mode.or(file.dev_mode).unwrap_or(false);

        Ok(Config {
            server,
            storage,
            redis,
            cors,
            upload,
            proxy,
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        })
    }
}
