//! Custom error types for the service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy surfaced to clients.
///
/// Known precondition failures carry their own message; anything unexpected is
/// logged at the call site and collapses into a generic 500.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Validation failure with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Bad credentials or bad/missing/expired token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Missing resource, including disguised cross-user access
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;
