use std::{fmt, sync::Arc};

use ricah_config::Config;
use ricah_core::OrderService;

#[derive(Clone)]
pub struct AppState {
    pub service: OrderService,
    /// Client the proxy endpoint relays upstream fetches through.
    pub proxy_client: reqwest::Client,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(service: OrderService, config: Arc<Config>) -> Self {
        Self {
            service,
            proxy_client: reqwest::Client::new(),
            config,
        }
    }
}
