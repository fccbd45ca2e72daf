// crates/server/src/error.rs
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use subgen_core::StorageError;
use thiserror::Error;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes.
///
/// An unknown job id is deliberately absent: the status endpoint reports it
/// as a distinct `unknown` state with 200, not as an error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
            ApiError::Multipart(err) => {
                // Preserves the extractor's status: 413 for an oversized
                // body, 400 for malformed multipart.
                tracing::warn!(error = %err, "Invalid upload");
                (
                    err.status(),
                    ErrorResponse::with_details("Invalid upload", err.body_text()),
                )
            }
            ApiError::ArtifactNotFound(name) => {
                tracing::warn!(artifact = %name, "Artifact not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("Artifact not found", name.clone()),
                )
            }
            ApiError::Storage(storage_err) => match storage_err {
                StorageError::InvalidName(name) => {
                    tracing::warn!(name = %name, "Rejected artifact name");
                    (
                        StatusCode::BAD_REQUEST,
                        ErrorResponse::with_details("Bad request", storage_err.to_string()),
                    )
                }
                StorageError::CreateDir { .. } => {
                    tracing::error!(error = %storage_err, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::new("Internal server error"),
                    )
                }
            },
            ApiError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    // Internal errors never expose details to clients.
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
