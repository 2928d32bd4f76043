//! Request bodies for `/api/notes`. Notes themselves serialize directly.

use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /api/notes` and `PUT /api/notes/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct NoteRequest {
    /// Note title; must not be blank.
    pub title: String,
    /// Note body; omitted or `null` is stored as an empty string.
    pub content: Option<String>,
}
