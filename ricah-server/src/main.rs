use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args as ClapArgs, Parser};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use ricah_config::{ConfigLoad, ConfigLoader, StorageMethod};
use ricah_core::{
    BlobObjectStore, FsObjectStore, MemoryOrderStore, ObjectStore,
    OrderService, OrderStore, RedisOrderStore,
};
use ricah_server::{AppState, create_app};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "ricah-server")]
#[command(
    about = "Media gallery server with an ordered public feed, uploads, and admin reordering"
)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, env = "RICAH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.serve.config {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let Some(port) = cli.serve.port {
        config.server.port = port;
    }
    if let Some(host) = cli.serve.host.clone() {
        config.server.host = host;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Quieter defaults; override via RUST_LOG.
                    "info,tower_http=warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    if !warnings.is_empty() {
        for warning in &warnings.items {
            match &warning.hint {
                Some(hint) => {
                    warn!(message = %warning.message, hint = %hint, "configuration warning")
                }
                None => {
                    warn!(message = %warning.message, "configuration warning")
                }
            }
        }
    }

    config
        .ensure_directories()
        .context("failed to prepare media directories")?;

    let config = Arc::new(config);

    let objects: Arc<dyn ObjectStore> = match config.storage.method {
        StorageMethod::Filesystem => {
            info!(
                root = %config.storage.media_root.display(),
                "using filesystem object store"
            );
            Arc::new(FsObjectStore::new(&config.storage.media_root))
        }
        StorageMethod::Blob => {
            let blob = config
                .storage
                .blob
                .as_ref()
                .context("blob storage selected but not configured")?;
            let base_url = Url::parse(&blob.base_url)
                .context("invalid blob base url")?;
            info!(base_url = %base_url, "using blob object store");
            Arc::new(BlobObjectStore::new(base_url, blob.token.clone()))
        }
    };

    let orders: Arc<dyn OrderStore> = match &config.redis {
        Some(redis) => Arc::new(RedisOrderStore::new(&redis.url).await?),
        None => {
            warn!("no Redis configured; using in-memory order store");
            Arc::new(MemoryOrderStore::new())
        }
    };

    let service = OrderService::new(objects, orders);
    let state = AppState::new(service, Arc::clone(&config));
    let router = create_app(state);

    let addr: SocketAddr =
        format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .context("invalid server address")?;
    info!("Ricah server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
