//! HTTP error handling and response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request
    BadRequest(String),
    /// Internal server error; details are logged, not returned
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new(msg)),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new(msg)),
            AppError::Internal(msg) => {
                error!("Internal error while serving request: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::Error> for AppError {
    fn from(err: crate::Error) -> Self {
        match err {
            crate::Error::JobNotFound { .. } => AppError::NotFound("Report not found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}
