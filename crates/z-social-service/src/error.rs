//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use z_social_core::SocialError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid session token.
    #[error("unauthorized")]
    Unauthorized,

    /// Login failed. Does not reveal whether the username exists.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Forbidden - valid session but acting on someone else's profile.
    #[error("forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Username failed normalization or validation.
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - username already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Upload over the configured size limit.
    #[error("upload exceeds {limit_bytes} bytes")]
    PayloadTooLarge {
        /// The configured limit.
        limit_bytes: usize,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
                None,
            ),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
                None,
            ),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string(), None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::InvalidUsername(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_username",
                msg.clone(),
                None,
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone(), None),
            Self::PayloadTooLarge { limit_bytes } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                self.to_string(),
                Some(serde_json::json!({ "limit_bytes": limit_bytes })),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<SocialError> for ApiError {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::InvalidUsername { reason } => Self::InvalidUsername(reason),
            SocialError::InvalidPassword { .. }
            | SocialError::SelfFollow
            | SocialError::InvalidUpload(_)
            | SocialError::InvalidProfile(_)
            | SocialError::InvalidId(_) => Self::BadRequest(err.to_string()),
            SocialError::DuplicateUsername { .. } => Self::Conflict(err.to_string()),
            SocialError::InvalidCredentials => Self::InvalidCredentials,
            SocialError::Forbidden => Self::Forbidden,
            SocialError::AccountNotFound { .. } | SocialError::ProfileNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            SocialError::PayloadTooLarge { limit_bytes } => Self::PayloadTooLarge { limit_bytes },
            SocialError::Storage(msg)
            | SocialError::Serialization(msg)
            | SocialError::PasswordHash(msg) => Self::Internal(msg),
        }
    }
}

impl From<z_social_store::StoreError> for ApiError {
    fn from(err: z_social_store::StoreError) -> Self {
        SocialError::from(err).into()
    }
}
