//! Error types for grouplog.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::storage::StorageError;

/// Result type alias for grouplog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for grouplog.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // NotFound is an expected lookup outcome; Invalid is the caller's
        // fault. Everything else is an internal failure.
        let status = match &self {
            Error::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            Error::Storage(StorageError::Invalid(_)) => StatusCode::BAD_REQUEST,
            Error::Storage(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "code": status.as_u16()
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
