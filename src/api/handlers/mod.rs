//! REST endpoint handlers organized by resource.

pub mod auth;
pub mod notes;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Routes reachable without credentials, relative to `/api`.
pub fn public_routes() -> Router<AppState> {
    auth::routes()
}

/// Routes that must sit behind `require_auth`, relative to `/api`.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .merge(notes::routes())
        .merge(auth::protected_routes())
}
