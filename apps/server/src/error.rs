//! API error type and response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use sellbridge_core::errors::Error as CoreError;
use sellbridge_marketplace::errors::MarketplaceError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP callers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UpstreamFailed(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UpstreamFailed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("API error: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
            CoreError::Forbidden(msg) => ApiError::Forbidden(msg),
            CoreError::Validation(e) => ApiError::BadRequest(e.to_string()),
            CoreError::Marketplace(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<MarketplaceError> for ApiError {
    fn from(err: MarketplaceError) -> Self {
        match err {
            MarketplaceError::Validation { .. } => ApiError::BadRequest(err.to_string()),
            MarketplaceError::Authentication { .. } => ApiError::Unauthorized(err.to_string()),
            MarketplaceError::Permission { .. } => ApiError::Forbidden(err.to_string()),
            MarketplaceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            MarketplaceError::Unsupported { .. } => ApiError::BadRequest(err.to_string()),
            _ => ApiError::UpstreamFailed(err.to_string()),
        }
    }
}
