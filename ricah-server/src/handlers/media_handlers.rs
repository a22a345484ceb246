use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::AppState;
use crate::errors::AppResult;
use ricah_model::MediaObject;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// `random` serves a transient shuffled permutation instead of the
    /// persisted order.
    view: Option<String>,
}

/// The public feed: every stored media object, persisted order first,
/// unlisted objects newest-first behind it.
pub async fn get_media_handler(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<MediaObject>>> {
    let feed = match query.view.as_deref() {
        Some("random") => state.service.random_feed().await?,
        _ => state.service.feed().await?,
    };
    debug!(count = feed.len(), "serving media feed");
    Ok(Json(feed))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    url: String,
}

/// Delete a media object by locator and drop its id from the order list.
pub async fn delete_media_handler(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<Json<Value>> {
    state.service.delete(&query.url).await?;
    Ok(Json(json!({ "message": "File deleted successfully" })))
}
