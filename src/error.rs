//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the service layer and the
//! handlers. Each variant maps to a specific HTTP status code and structured
//! JSON error response.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::persistence::StoreError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "conflict: username already exists"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                     |
/// |-----------|---------------------|---------------------------------|
/// | 1000–1999 | Validation          | 400 Bad Request                 |
/// | 2000–2999 | State / Not Found   | 409 Conflict / 404 Not Found    |
/// | 3000–3999 | Server              | 500 Internal Server Error       |
/// | 4000–4999 | Authentication      | 401 Unauthorized / 403 Forbidden |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or incomplete input.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A unique key (username, record id) already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing, malformed, expired or otherwise invalid credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated, but not the owner of the entity.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Storage medium failure, surfaced unmodified.
    #[error("storage error: {0}")]
    Storage(StoreError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::Conflict(_) => 2001,
            Self::NotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
            Self::Unauthenticated(_) => 4001,
            Self::Forbidden(_) => 4003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
