use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorResponse;
use crate::services::AuthError;

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    /// Reported as 400, which is what clients of the bootstrap endpoint expect.
    Conflict(String),

    Unauthorized(String),

    MethodNotAllowed,

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::MethodNotAllowed => write!(f, "Method not allowed"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::ValidationError(msg) | Self::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
            ),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorResponse::new(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => Self::ValidationError(msg),
            AuthError::IncorrectUsername
            | AuthError::IncorrectPassword
            | AuthError::Unauthenticated => Self::Unauthorized(err.to_string()),
            AuthError::AdminExists => Self::Conflict(err.to_string()),
            AuthError::Internal(msg) => Self::InternalError(msg),
        }
    }
}
