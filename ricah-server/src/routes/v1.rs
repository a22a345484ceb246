use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    handlers::{
        media_handlers, order_handlers, proxy_handlers, upload_handlers,
    },
};

/// Create all v1 API routes
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public feed
        .route("/media", get(media_handlers::get_media_handler))
        // Order list: read and wholesale replace
        .route(
            "/order",
            get(order_handlers::get_order_handler)
                .post(order_handlers::save_order_handler),
        )
        // Admin mutations
        .route(
            "/upload",
            post(upload_handlers::upload_media_handler)
                .layer(DefaultBodyLimit::max(state.config.upload.max_bytes)),
        )
        .route("/media", delete(media_handlers::delete_media_handler))
        // Remote-media relay
        .route("/proxy", get(proxy_handlers::proxy_media_handler))
}
