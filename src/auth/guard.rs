//! Middleware and extractor for protected routes.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tower_sessions::Session;

use crate::app_state::AppState;
use crate::domain::UserProfile;
use crate::error::ApiError;

/// The authenticated caller, attached to the request by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthenticated("authentication required".to_string()))
    }
}

/// Runs the process-wide [`AuthStrategy`](super::AuthStrategy) before the
/// handler and rejects the request with 401 if it fails.
///
/// # Errors
///
/// Returns the [`ApiError`] produced by the strategy.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = request.extensions().get::<Session>().cloned();
    let profile = state
        .auth
        .authenticate(request.headers(), session.as_ref(), &state.users)
        .await
        .inspect_err(|e| tracing::debug!(error = %e, uri = %request.uri(), "request rejected"))?;

    request.extensions_mut().insert(CurrentUser(profile));
    Ok(next.run(request).await)
}
