//! Request and response bodies for `/api/auth`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{UserId, UserProfile};
use crate::error::ApiError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// `POST /api/auth/register` body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    /// Desired username, unique ignoring case.
    pub username: String,
    /// Plain-text password, at least six characters.
    pub password: String,
}

impl RegisterRequest {
    /// Checks presence of both fields and the password length.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation(
                "username and password are required".to_string(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(())
    }
}

/// `POST /api/auth/register` response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterResponse {
    /// Human-readable acknowledgement.
    pub message: String,
    /// Id of the new account.
    pub user_id: UserId,
    /// Username as stored.
    pub username: String,
}

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Username, matched ignoring case.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl LoginRequest {
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] if either field is empty.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation(
                "username and password are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// `POST /api/auth/login` response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Human-readable acknowledgement.
    pub message: String,
    /// Bearer token; present only in stateless mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// The logged-in user.
    pub user: UserProfile,
}

/// `GET /api/auth/me` response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeResponse {
    /// The authenticated caller.
    pub user: UserProfile,
}
