use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::AppState;
use crate::errors::AppResult;
use ricah_model::MediaId;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Vec<MediaId>,
    pub revision: u64,
}

/// The persisted order list. An order that was never written reads as empty
/// at revision 0.
pub async fn get_order_handler(
    State(state): State<AppState>,
) -> AppResult<Json<OrderResponse>> {
    let record = state.service.current_order().await?;
    Ok(Json(OrderResponse {
        order: record.ids,
        revision: record.revision,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SaveOrderRequest {
    pub order: Vec<MediaId>,
    /// Revision the client read. Omitted keeps last-writer-wins.
    #[serde(default)]
    pub revision: Option<u64>,
}

/// Replace the order list wholesale with a client-submitted permutation.
pub async fn save_order_handler(
    State(state): State<AppState>,
    Json(body): Json<SaveOrderRequest>,
) -> AppResult<Json<Value>> {
    let revision = state.service.replace(body.order, body.revision).await?;
    Ok(Json(json!({
        "message": "Order saved successfully",
        "revision": revision,
    })))
}
