//! Note CRUD handlers. Every route here sits behind `require_auth`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{MessageResponse, NoteRequest};
use crate::app_state::AppState;
use crate::auth::CurrentUser;
use crate::domain::{Note, NoteId};
use crate::error::{ApiError, ErrorResponse};

/// `POST /api/notes` — Create a note for the caller.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for a malformed body or blank title.
#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Notes",
    summary = "Create a note",
    security(("bearerAuth" = [])),
    request_body = NoteRequest,
    responses(
        (status = 201, description = "Note created", body = Note),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let note = state
        .notes
        .create_note(&user.id, &req.title, req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// `GET /api/notes` — The caller's notes, most recently updated first.
///
/// # Errors
///
/// Returns [`ApiError::Storage`] on backend failure.
#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Notes",
    summary = "List notes",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Caller's notes", body = Vec<Note>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    )
)]
pub async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.notes.list_notes(&user.id).await?))
}

/// `GET /api/notes/{id}` — One note.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] or [`ApiError::Forbidden`].
#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    tag = "Notes",
    summary = "Get a note",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = Note),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse),
    )
)]
pub async fn get_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<NoteId>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.notes.get_note(&id, &user.id).await?))
}

/// `PUT /api/notes/{id}` — Replace title and content.
///
/// # Errors
///
/// Returns [`ApiError::Validation`], [`ApiError::NotFound`] or
/// [`ApiError::Forbidden`].
#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    tag = "Notes",
    summary = "Update a note",
    description = "Replaces title and content. An omitted content clears the note body.",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Note id")),
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Updated note", body = Note),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse),
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<NoteId>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let Json(req) = payload?;
    let note = state
        .notes
        .update_note(&id, &user.id, &req.title, req.content)
        .await?;
    Ok(Json(note))
}

/// `DELETE /api/notes/{id}` — Delete a note.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] or [`ApiError::Forbidden`].
#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    tag = "Notes",
    summary = "Delete a note",
    security(("bearerAuth" = [])),
    params(("id" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse),
    )
)]
pub async fn delete_note(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<NoteId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.notes.delete_note(&id, &user.id).await?;
    Ok(Json(MessageResponse::new("note deleted successfully")))
}

/// Note routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
}
