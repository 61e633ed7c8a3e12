//! Error handling and HTTP error conversion
//!
//! This module defines how domain errors are translated to HTTP error responses.
//!
//! # Architecture
//!
//! Errors from `page_config` are converted to HTTP responses with appropriate
//! status codes and error messages. This conversion happens at the HTTP
//! boundary and never exposes internal implementation details.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use page_config::{PageConfigError, PathSegment};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Standard error response for all API errors.
///
/// All error responses follow this consistent structure to provide
/// machine-readable error codes and human-readable messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetails,
}

/// Error details structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional context (optional, type varies by error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Axum response wrapper for API errors
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<AppState>) -> Result<Json<PageResponse>, ApiError> {
///     let page = state.store.get_page("homepage")?; // Converts PageConfigError to ApiError
///     Ok(Json(PageResponse::new("homepage", page)))
/// }
/// ```
#[derive(Debug)]
pub enum ApiError {
    /// Error raised by the configuration store
    Config(PageConfigError),

    /// Request body was missing, not JSON, or not the expected shape
    InvalidBody { status: StatusCode, message: String },

    /// Unexpected failure
    Internal(String),
}

impl ApiError {
    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PageConfigError> for ApiError {
    fn from(err: PageConfigError) -> Self {
        ApiError::Config(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Config(err) => write!(f, "{}", err),
            ApiError::InvalidBody { message, .. } => {
                write!(f, "invalid request body: {}", message)
            }
            ApiError::Internal(message) => write!(f, "internal error: {}", message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = convert_error(&self);

        // Log error server-side
        log_error(&self, status);

        (status, Json(error_response)).into_response()
    }
}

fn error_response(
    code: &str,
    message: String,
    details: Option<serde_json::Value>,
) -> ErrorResponse {
    ErrorResponse {
        error: ErrorDetails {
            code: code.to_string(),
            message,
            details,
        },
    }
}

/// Convert an API error to HTTP status code and error response
pub(crate) fn convert_error(error: &ApiError) -> (StatusCode, ErrorResponse) {
    match error {
        ApiError::Config(err) => convert_page_config_error(err),
        ApiError::InvalidBody { status, message } => (
            *status,
            error_response("InvalidRequestBody", message.clone(), None),
        ),
        ApiError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_response(
                "InternalError",
                "An internal error occurred".to_string(),
                None,
            ),
        ),
    }
}

/// Convert a store error to HTTP status code and error response
pub(crate) fn convert_page_config_error(error: &PageConfigError) -> (StatusCode, ErrorResponse) {
    match error {
        PageConfigError::PathNotFound { path, missing } => {
            let name = match missing {
                PathSegment::Page => Some(path.page.as_str()),
                PathSegment::Section => path.section.as_deref(),
            };
            (
                StatusCode::NOT_FOUND,
                error_response(
                    "PathNotFound",
                    format!("The {} '{}' does not exist", missing, name.unwrap_or_default()),
                    Some(json!({
                        "page": path.page,
                        "section": path.section,
                        "field": path.field,
                        "missing": missing,
                    })),
                ),
            )
        }
        PageConfigError::InvalidValue { path, reason } => (
            StatusCode::BAD_REQUEST,
            error_response(
                "InvalidValue",
                error.to_string(),
                Some(json!({
                    "path": path.to_string(),
                    "reason": reason,
                })),
            ),
        ),
        PageConfigError::ParseError { .. } => (
            StatusCode::BAD_REQUEST,
            error_response("ParseError", error.to_string(), None),
        ),
        PageConfigError::FileNotFound { .. }
        | PageConfigError::FileAccessError { .. }
        | PageConfigError::PersistenceFailed { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_response(
                "InternalError",
                "An internal error occurred".to_string(),
                None,
            ),
        ),
    }
}

/// Log error with appropriate level based on HTTP status
fn log_error(error: &ApiError, status: StatusCode) {
    match status {
        StatusCode::INTERNAL_SERVER_ERROR | StatusCode::BAD_GATEWAY => {
            tracing::error!("API error: {} - {}", status, error);
        }
        StatusCode::BAD_REQUEST
        | StatusCode::NOT_FOUND
        | StatusCode::UNPROCESSABLE_ENTITY
        | StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            tracing::warn!("API error: {} - {}", status, error);
        }
        _ => {
            tracing::info!("API error: {} - {}", status, error);
        }
    }
}
