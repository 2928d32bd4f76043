//! User service: registration, credential checks, lookups.

use std::sync::Arc;

use crate::auth::password;
use crate::domain::{User, UserId};
use crate::error::ApiError;
use crate::persistence::NoteStore;

/// Account operations layered over the [`NoteStore`].
#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<dyn NoteStore>,
}

impl UserService {
    /// Creates a new `UserService`.
    #[must_use]
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] if the username is taken (ignoring
    /// case), or a storage/hashing error.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, ApiError> {
        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(ApiError::Conflict("username already exists".to_string()));
        }

        let password_hash = password::hash_password_blocking(password.to_string()).await?;
        let user = self.store.save_user(User::new(username, password_hash)).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Checks a username/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] for an unknown user or a wrong
    /// password; both cases produce the same message.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let Some(user) = self.store.get_user_by_username(username).await? else {
            tracing::debug!(username, "login for unknown user");
            return Err(invalid_credentials());
        };

        let valid =
            password::verify_password_blocking(password.to_string(), user.password_hash.clone())
                .await?;
        if !valid {
            tracing::debug!(user_id = %user.id, "login with wrong password");
            return Err(invalid_credentials());
        }

        Ok(user)
    }

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error on medium failure.
    pub async fn get_user(&self, id: &UserId) -> Result<Option<User>, ApiError> {
        Ok(self.store.get_user_by_id(id).await?)
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthenticated("invalid username or password".to_string())
}
