//! Error taxonomy for the HTTP surface.
//!
//! Storage functions return `anyhow::Result`; handlers turn those into
//! [`ApiError::Internal`] with `?`, and every variant knows its status code
//! and JSON shape.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Message returned for a missing or mismatched API key.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized access!";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed client input
    #[error("{0}")]
    BadRequest(String),

    /// API key absent or wrong
    #[error("{}", UNAUTHORIZED_MESSAGE)]
    Forbidden,

    /// The query matched nothing
    #[error("{0}")]
    NotFound(String),

    /// Storage or other unexpected failure
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            // Empty results are reported as a message, not an error.
            Self::NotFound(message) => json!({ "message": message }),
            Self::Internal(err) => {
                error!(error = %err, "Request failed");
                json!({ "error": err.to_string() })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn not_found_uses_message_key() {
        let (status, body) = body_json(ApiError::not_found("No invoices found.")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "No invoices found." }));
    }

    #[tokio::test]
    async fn internal_errors_surface_the_underlying_message() {
        let (status, body) = body_json(anyhow::anyhow!("no such table: invoices").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "no such table: invoices" }));
    }

    #[tokio::test]
    async fn forbidden_body_matches_contract() {
        let (status, body) = body_json(ApiError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "error": UNAUTHORIZED_MESSAGE }));
    }
}
