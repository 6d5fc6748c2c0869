//! Error types for invio-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::SessionError;
use crate::services::{ExtractionError, IngestionError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Step precondition broken: required transient keys absent or
    /// unusable (409). The screens redirect back to the upload step.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// Extraction service rejected the file type (400)
    #[error("Invalid file type. Please upload a PDF only.")]
    InvalidFileType,

    /// An external webhook failed (502); retry is manual
    #[error("Upstream service error: {0}")]
    Upstream(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// invio-common error
    #[error("{0}")]
    Common(#[from] invio_common::Error),
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidFileType => ApiError::InvalidFileType,
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<IngestionError> for ApiError {
    fn from(err: IngestionError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Session(ref err) => {
                let code = match err {
                    SessionError::Missing(_) => "MISSING_SESSION",
                    SessionError::Malformed(_) => "SESSION_CORRUPT",
                };
                (StatusCode::CONFLICT, code, err.to_string())
            }
            ApiError::InvalidFileType => (
                StatusCode::BAD_REQUEST,
                "INVALID_FILE_TYPE",
                ApiError::InvalidFileType.to_string(),
            ),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Io(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "IO_ERROR",
                err.to_string(),
            ),
            ApiError::Other(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
            ApiError::Common(err) => match err {
                invio_common::Error::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
                invio_common::Error::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
                }
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    other.to_string(),
                ),
            },
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
