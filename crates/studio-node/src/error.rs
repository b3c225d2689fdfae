//! Application-level error type returned by handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use studio_core::StudioError;
use thiserror::Error;

/// An error a handler can return; converts directly to an HTTP response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Validation failures keep every message; `message` is the first.
    #[error("{message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, Vec::new()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, Vec::new()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, Vec::new()),
            AppError::Validation { message, errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_failed",
                message,
                errors,
            ),
            AppError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, "timeout", msg, Vec::new()),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    msg,
                    Vec::new(),
                )
            }
        };

        let body = ErrorBody {
            error: code,
            message,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

impl From<StudioError> for AppError {
    fn from(e: StudioError) -> Self {
        match e {
            StudioError::IntentInvalid { errors } => AppError::Validation {
                message: errors.first().cloned().unwrap_or_default(),
                errors,
            },
            StudioError::Provider(msg) | StudioError::ImportFormat(msg) => AppError::BadRequest(msg),
            e @ (StudioError::MalformedHex(_) | StudioError::Export(_)) => {
                AppError::BadRequest(e.to_string())
            }
            e @ StudioError::Timeout { .. } => AppError::Timeout(e.to_string()),
            e => AppError::Internal(e.to_string()),
        }
    }
}
