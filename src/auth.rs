//! Shared-secret API key check applied in front of every invoice route.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::server::AppState;

/// Header clients carry the shared secret in.
pub const API_KEY_HEADER: &str = "x-api-key";

fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Exact string comparison against the configured key.
fn is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    extract_api_key(headers) == Some(expected)
}

/// Axum middleware that rejects requests without the configured API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_authorized(req.headers(), state.api_key()) {
        warn!(method = %req.method(), path = %req.uri().path(), "Rejected request with missing or invalid API key");
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}
