use axum::{Json, extract::Multipart, extract::State};
use tracing::info;

use crate::AppState;
use crate::errors::{AppError, AppResult};
use ricah_model::MediaObject;

/// Accept a multipart upload (field `media`), store it, and append it to the
/// order list. The body-size cap is enforced by the route's body limit.
pub async fn upload_media_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<MediaObject>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        if field.name() != Some("media") {
            continue;
        }

        let name = field
            .file_name()
            .map(|name| name.to_string())
            .ok_or_else(|| AppError::bad_request("Upload has no file name"))?;
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::bad_request(err.to_string()))?;

        info!(name = %name, size = bytes.len(), "upload received");
        let object = state
            .service
            .upload(&name, &content_type, bytes.to_vec())
            .await?;
        return Ok(Json(object));
    }

    Err(AppError::bad_request("No file uploaded"))
}
