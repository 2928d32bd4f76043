//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Account and note endpoints are mounted under `/api`; service info,
//! health and the OpenAPI document live at the root. Protected routes
//! share one `require_auth` route layer, and the session layer is added
//! only when the stateful strategy is active.

pub mod docs;
pub mod dto;
pub mod handlers;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::auth::require_auth;

/// Builds the complete application router.
pub fn build_router(state: AppState) -> Router {
    let protected = handlers::protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_auth,
    ));

    let api = handlers::public_routes().merge(protected);

    let router = Router::new()
        .nest("/api", api)
        .merge(handlers::system::routes())
        .merge(docs::routes())
        .fallback(handlers::system::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let router = match state.auth.session_layer() {
        Some(sessions) => router.layer(sessions),
        None => router,
    };

    router.with_state(state)
}
