//! Authentication: strategy selection and request gating.
//!
//! Exactly one [`AuthStrategy`] is chosen at startup from [`AuthSettings`]:
//!
//! - **Stateless token**: login returns a signed JWT; every protected
//!   request must carry `Authorization: Bearer <token>`. Logout is a no-op
//!   acknowledgement (the client discards the token).
//! - **Stateful session**: login stores the user profile in a server-side
//!   session identified by a cookie; logout destroys the session.
//!
//! Handlers never branch on the mode themselves. Protected routes sit behind
//! [`guard::require_auth`], which calls [`AuthStrategy::authenticate`] and
//! hands the result to handlers as [`guard::CurrentUser`].

pub mod guard;
pub mod password;
pub mod session;
pub mod token;

use std::fmt;
use std::str::FromStr;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use serde::Serialize;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use crate::domain::{User, UserProfile};
use crate::error::ApiError;
use crate::service::UserService;

pub use guard::{CurrentUser, require_auth};
pub use session::{MaybeSession, SessionSettings};
pub use token::TokenIssuer;

/// Closed set of authentication modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Signed bearer tokens, no server-side state.
    #[default]
    Stateless,
    /// Cookie-identified server-side sessions.
    Stateful,
}

impl AuthMode {
    /// Configuration string for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stateless => "stateless",
            Self::Stateful => "stateful",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an auth mode string is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown auth mode: {0}")]
pub struct UnknownAuthMode(pub String);

impl FromStr for AuthMode {
    type Err = UnknownAuthMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stateless" | "jwt" | "token" => Ok(Self::Stateless),
            "stateful" | "session" => Ok(Self::Stateful),
            other => Err(UnknownAuthMode(other.to_string())),
        }
    }
}

/// Authentication configuration.
#[derive(Clone)]
pub struct AuthSettings {
    /// Which strategy guards protected routes.
    pub mode: AuthMode,
    /// Shared HS256 secret for bearer tokens.
    pub jwt_secret: String,
    /// Bearer token lifetime in seconds.
    pub jwt_ttl_secs: u64,
    /// Session inactivity timeout in seconds.
    pub session_max_age_secs: u64,
    /// Mark the session cookie `Secure`.
    pub session_secure: bool,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("mode", &self.mode)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_ttl_secs", &self.jwt_ttl_secs)
            .field("session_max_age_secs", &self.session_max_age_secs)
            .field("session_secure", &self.session_secure)
            .finish()
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            mode: AuthMode::Stateless,
            jwt_secret: "default_jwt_secret_change_in_production".to_string(),
            jwt_ttl_secs: 86_400,
            session_max_age_secs: 86_400,
            session_secure: false,
        }
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    /// Signed bearer token (stateless mode only).
    pub token: Option<String>,
    /// Profile of the logged-in user.
    pub user: UserProfile,
}

/// The request-gating procedure selected for this process.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// Verify a bearer JWT and resolve its subject through the store.
    StatelessToken(TokenIssuer),
    /// Read the user profile from the server-side session.
    StatefulSession(SessionSettings),
}

impl AuthStrategy {
    /// Selects the strategy named by `settings.mode`.
    #[must_use]
    pub fn from_settings(settings: &AuthSettings) -> Self {
        let strategy = match settings.mode {
            AuthMode::Stateless => Self::StatelessToken(TokenIssuer::new(
                settings.jwt_secret.clone(),
                settings.jwt_ttl_secs,
            )),
            AuthMode::Stateful => Self::StatefulSession(SessionSettings {
                max_age_secs: settings.session_max_age_secs,
                secure: settings.session_secure,
            }),
        };
        tracing::info!(auth_mode = %strategy.mode(), "authentication strategy selected");
        strategy
    }

    /// Mode of this strategy.
    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        match self {
            Self::StatelessToken(_) => AuthMode::Stateless,
            Self::StatefulSession(_) => AuthMode::Stateful,
        }
    }

    /// Session middleware to install, if this strategy needs one.
    #[must_use]
    pub fn session_layer(&self) -> Option<SessionManagerLayer<MemoryStore>> {
        match self {
            Self::StatelessToken(_) => None,
            Self::StatefulSession(settings) => Some(settings.layer()),
        }
    }

    /// Resolves the caller of a request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] when the credential is missing
    /// or malformed, fails verification, or names a user that no longer
    /// exists. Storage and session-store failures propagate as-is.
    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        session: Option<&Session>,
        users: &UserService,
    ) -> Result<UserProfile, ApiError> {
        match self {
            Self::StatelessToken(issuer) => {
                let token = bearer_token(headers).ok_or_else(|| {
                    ApiError::Unauthenticated("authentication required, no token provided".into())
                })?;
                let user_id = issuer.verify(token)?;
                let user = users
                    .get_user(&user_id)
                    .await?
                    .ok_or_else(|| ApiError::Unauthenticated("user not found".into()))?;
                Ok(user.profile())
            }
            Self::StatefulSession(_) => {
                let Some(session) = session else {
                    return Err(ApiError::Unauthenticated(
                        "authentication required, please log in".into(),
                    ));
                };
                session::current_profile(session).await?.ok_or_else(|| {
                    ApiError::Unauthenticated("authentication required, please log in".into())
                })
            }
        }
    }

    /// Issues a token or establishes a session for `user`, never both.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if signing fails, if the session store
    /// fails, or if stateful mode runs without a session layer.
    pub async fn login(
        &self,
        user: &User,
        session: Option<&Session>,
    ) -> Result<LoginGrant, ApiError> {
        let profile = user.profile();
        match self {
            Self::StatelessToken(issuer) => Ok(LoginGrant {
                token: Some(issuer.issue(&user.id)?),
                user: profile,
            }),
            Self::StatefulSession(_) => {
                let session = session.ok_or_else(missing_session_layer)?;
                session::establish(session, &profile).await?;
                Ok(LoginGrant {
                    token: None,
                    user: profile,
                })
            }
        }
    }

    /// Ends the caller's login and returns the acknowledgement message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the session cannot be destroyed.
    pub async fn logout(&self, session: Option<&Session>) -> Result<&'static str, ApiError> {
        match (self, session) {
            (Self::StatelessToken(_), _) => Ok(
                "logout successful on client side; discard the token to end the login",
            ),
            (Self::StatefulSession(_), Some(session)) => {
                session::destroy(session).await?;
                Ok("logout successful")
            }
            (Self::StatefulSession(_), None) => Err(missing_session_layer()),
        }
    }
}

fn missing_session_layer() -> ApiError {
    ApiError::Internal("session layer is not installed".to_string())
}

/// Extracts the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::http::HeaderValue;

    use super::*;
    use crate::persistence::{MemoryStore as NoteMemoryStore, NoteStore};

    fn token_settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "unit-test-secret".to_string(),
            ..AuthSettings::default()
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Ok(value) = HeaderValue::from_str(value) else {
            panic!("invalid header value");
        };
        headers.insert(AUTHORIZATION, value);
        headers
    }

    async fn users_with_alice() -> (Arc<dyn NoteStore>, UserService, User) {
        let store: Arc<dyn NoteStore> = Arc::new(NoteMemoryStore::new());
        let users = UserService::new(Arc::clone(&store));
        let Ok(alice) = store.save_user(User::new("alice", "hash")).await else {
            panic!("save failed");
        };
        (store, users, alice)
    }

    #[test]
    fn auth_mode_parsing() {
        assert_eq!("stateful".parse::<AuthMode>().ok(), Some(AuthMode::Stateful));
        assert_eq!("STATELESS".parse::<AuthMode>().ok(), Some(AuthMode::Stateless));
        assert!("oauth".parse::<AuthMode>().is_err());
        assert_eq!(AuthMode::default(), AuthMode::Stateless);
    }

    #[test]
    fn strategy_follows_mode() {
        let stateless = AuthStrategy::from_settings(&token_settings());
        assert_eq!(stateless.mode(), AuthMode::Stateless);
        assert!(stateless.session_layer().is_none());

        let stateful = AuthStrategy::from_settings(&AuthSettings {
            mode: AuthMode::Stateful,
            ..AuthSettings::default()
        });
        assert_eq!(stateful.mode(), AuthMode::Stateful);
        assert!(stateful.session_layer().is_some());
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers_with("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn token_login_then_authenticate() {
        let (_store, users, alice) = users_with_alice().await;
        let strategy = AuthStrategy::from_settings(&token_settings());

        let Ok(grant) = strategy.login(&alice, None).await else {
            panic!("login failed");
        };
        let Some(token) = grant.token else {
            panic!("stateless login must issue a token");
        };

        let headers = headers_with(&format!("Bearer {token}"));
        let Ok(profile) = strategy.authenticate(&headers, None, &users).await else {
            panic!("authenticate failed");
        };
        assert_eq!(profile, alice.profile());
    }

    #[tokio::test]
    async fn token_for_vanished_user_is_rejected() {
        let (store, users, alice) = users_with_alice().await;
        let strategy = AuthStrategy::from_settings(&token_settings());
        let Ok(grant) = strategy.login(&alice, None).await else {
            panic!("login failed");
        };
        let Some(token) = grant.token else {
            panic!("missing token");
        };
        let Ok(_) = store.clear_all().await else {
            panic!("clear failed");
        };

        let headers = headers_with(&format!("Bearer {token}"));
        let result = strategy.authenticate(&headers, None, &users).await;
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[tokio::test]
    async fn missing_credentials_are_rejected_in_both_modes() {
        let (_store, users, _alice) = users_with_alice().await;
        let stateless = AuthStrategy::from_settings(&token_settings());
        let stateful = AuthStrategy::from_settings(&AuthSettings {
            mode: AuthMode::Stateful,
            ..AuthSettings::default()
        });

        let empty = HeaderMap::new();
        assert!(matches!(
            stateless.authenticate(&empty, None, &users).await,
            Err(ApiError::Unauthenticated(_))
        ));
        assert!(matches!(
            stateful.authenticate(&empty, None, &users).await,
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn stateless_logout_is_acknowledged() {
        let strategy = AuthStrategy::from_settings(&token_settings());
        assert!(strategy.logout(None).await.is_ok());
    }

    #[tokio::test]
    async fn stateful_login_without_session_layer_is_an_error() {
        let (_store, _users, alice) = users_with_alice().await;
        let strategy = AuthStrategy::from_settings(&AuthSettings {
            mode: AuthMode::Stateful,
            ..AuthSettings::default()
        });
        assert!(matches!(
            strategy.login(&alice, None).await,
            Err(ApiError::Internal(_))
        ));
    }

    #[test]
    fn settings_debug_hides_secret() {
        let rendered = format!("{:?}", token_settings());
        assert!(!rendered.contains("unit-test-secret"));
    }
}
