//! API error handling.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use statichost_core::Error;

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// 401 with an empty body; nothing about the secret leaks.
    Unauthorized,
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => return StatusCode::UNAUTHORIZED.into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidDomain(_) => ApiError::BadRequest(err.to_string()),
            Error::NotFound(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

/// HTTP status for a deploy pipeline error.
pub fn deploy_status(err: &Error) -> StatusCode {
    match err {
        Error::InvalidDomain(_) => StatusCode::BAD_REQUEST,
        Error::PublishSourceMissing(_) | Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::ExecutorUnavailable(_) | Error::JobExecutionFailed { .. } | Error::Unexpected(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
