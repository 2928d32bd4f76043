//! Server-side sessions (`tower-sessions`, in-memory session store).
//!
//! The session layer is only installed when the stateful strategy is
//! selected, so handlers reach the session through [`MaybeSession`], which
//! never rejects.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::domain::UserProfile;
use crate::error::ApiError;

/// Session key holding the logged-in [`UserProfile`].
pub const SESSION_USER_KEY: &str = "user";

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "notes.sid";

/// Cookie and lifetime settings for the session layer.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Inactivity timeout in seconds.
    pub max_age_secs: u64,
    /// Send the cookie over HTTPS only.
    pub secure: bool,
}

impl SessionSettings {
    /// Builds the session middleware with a fresh in-memory store.
    #[must_use]
    pub fn layer(&self) -> SessionManagerLayer<MemoryStore> {
        let max_age = i64::try_from(self.max_age_secs).unwrap_or(i64::MAX);
        SessionManagerLayer::new(MemoryStore::default())
            .with_name(SESSION_COOKIE_NAME)
            .with_secure(self.secure)
            .with_http_only(true)
            .with_same_site(SameSite::Lax)
            .with_expiry(Expiry::OnInactivity(time::Duration::seconds(max_age)))
    }
}

/// The request's session, if a session layer is installed.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Session>().cloned()))
    }
}

/// Stores `profile` in a freshly cycled session.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the session store fails.
pub async fn establish(session: &Session, profile: &UserProfile) -> Result<(), ApiError> {
    session.cycle_id().await.map_err(session_error)?;
    session
        .insert(SESSION_USER_KEY, profile)
        .await
        .map_err(session_error)
}

/// Returns the profile stored by [`establish`], if any.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the session store fails.
pub async fn current_profile(session: &Session) -> Result<Option<UserProfile>, ApiError> {
    session
        .get::<UserProfile>(SESSION_USER_KEY)
        .await
        .map_err(session_error)
}

/// Deletes the session and its data.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the session store fails.
pub async fn destroy(session: &Session) -> Result<(), ApiError> {
    session.flush().await.map_err(session_error)
}

fn session_error(err: tower_sessions::session::Error) -> ApiError {
    ApiError::Internal(format!("session store failure: {err}"))
}
