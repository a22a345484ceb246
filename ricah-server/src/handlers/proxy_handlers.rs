use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::Response,
};
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::AppState;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    url: String,
}

/// Relay a remote object's bytes with the upstream content type, long-lived
/// cache headers, and permissive CORS so the feed can embed blob-store media
/// directly.
pub async fn proxy_media_handler(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> AppResult<Response> {
    let url = Url::parse(&query.url)
        .map_err(|err| AppError::bad_request(format!("invalid url: {err}")))?;

    let upstream = state
        .proxy_client
        .get(url)
        .send()
        .await
        .map_err(|err| AppError::bad_gateway(err.to_string()))?;

    if !upstream.status().is_success() {
        warn!(status = %upstream.status(), url = %query.url, "upstream fetch failed");
        return Err(AppError::bad_gateway(format!(
            "upstream returned {}",
            upstream.status()
        )));
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|err| AppError::bad_gateway(err.to_string()))?;

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CACHE_CONTROL,
            format!("public, max-age={}", state.config.proxy.cache_max_age),
        )
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(bytes))
        .map_err(|err| AppError::internal(err.to_string()))
}
