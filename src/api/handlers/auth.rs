//! Account handlers: register, login, logout, me.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    LoginRequest, LoginResponse, MeResponse, MessageResponse, RegisterRequest, RegisterResponse,
};
use crate::app_state::AppState;
use crate::auth::{CurrentUser, MaybeSession};
use crate::error::{ApiError, ErrorResponse};

/// `POST /api/auth/register` — Create an account.
///
/// # Errors
///
/// Returns [`ApiError`] on invalid input or a taken username.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    summary = "Register a new user",
    description = "Creates an account. Usernames are unique ignoring case; passwords need at least six characters.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state.users.register(req.username.trim(), &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user registered successfully".to_string(),
            user_id: user.id,
            username: user.username,
        }),
    ))
}

/// `POST /api/auth/login` — Exchange credentials for a token or a session.
///
/// # Errors
///
/// Returns [`ApiError::Unauthenticated`] on bad credentials.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "In stateless mode the response carries a bearer token. In stateful mode a session cookie is set and no token is returned.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .users
        .authenticate(req.username.trim(), &req.password)
        .await?;
    let grant = state.auth.login(&user, session.as_ref()).await?;

    tracing::info!(user_id = %user.id, auth_mode = %state.auth.mode(), "user logged in");
    Ok(Json(LoginResponse {
        message: "login successful".to_string(),
        token: grant.token,
        user: grant.user,
    }))
}

/// `POST /api/auth/logout` — End the current login.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the session cannot be destroyed.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    summary = "Log out",
    description = "Destroys the session in stateful mode. In stateless mode the client discards its token.",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    MaybeSession(session): MaybeSession,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.auth.logout(session.as_ref()).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// `GET /api/auth/me` — The authenticated caller.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    summary = "Current user",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = MeResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse { user })
}

/// Public account routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Account routes that require authentication, relative to `/api`.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}
