//! # Ricah Server
//!
//! Media gallery backend.
//!
//! ## Overview
//!
//! Ricah serves a single public feed of uploaded images and videos:
//!
//! - **Ordered Feed**: persisted admin ordering reconciled with the live
//!   object set, recency fallback for anything unlisted
//! - **Admin Mutations**: upload, delete, and drag-reorder, each keeping the
//!   order list consistent
//! - **Storage Proxies**: thin pass-throughs to the object store and the
//!   key-value store holding the order record
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - A local directory or a hosted blob service for object storage
//! - Redis for the persisted order record

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use errors::{AppError, AppResult};
pub use infra::app_state::AppState;

use axum::{Json, Router, http::Method, routing::get};
use ricah_config::StorageMethod;
use serde_json::{Value, json};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Assemble the application router: versioned API, health probe, static
/// media serving for the filesystem store, CORS and tracing layers.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state);

    let mut app = Router::new()
        .route("/health", get(health_handler))
        .merge(routes::create_api_router(state.clone()));

    // The filesystem store serves its objects straight off disk; the blob
    // store hands out absolute URLs instead.
    if state.config.storage.method == StorageMethod::Filesystem {
        app = app.nest_service(
            "/media",
            ServeDir::new(&state.config.storage.media_root),
        );
    }

    app.layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Permissive in dev, allow-list in prod; an empty origin list means any.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    if state.config.dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<axum::http::HeaderValue> = state
        .config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| axum::http::HeaderValue::from_str(s).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    let methods: Vec<Method> = state
        .config
        .cors
        .allowed_methods
        .iter()
        .filter_map(|m| Method::from_bytes(m.as_bytes()).ok())
        .collect();
    let headers: Vec<axum::http::HeaderName> = state
        .config
        .cors
        .allowed_headers
        .iter()
        .filter_map(|h| axum::http::HeaderName::from_bytes(h.as_bytes()).ok())
        .collect();

    let mut layer = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers));

    if state.config.cors.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "ricah-server",
    }))
}
