//! Note service: ownership-checked CRUD over the store.
//!
//! The storage contract has no notion of a caller, so every read or
//! mutation of an existing note goes through [`NoteService::get_note`]
//! first: absent notes are `NotFound`, notes of another user `Forbidden`.

use std::sync::Arc;

use crate::domain::{Note, NoteId, UserId};
use crate::error::ApiError;
use crate::persistence::NoteStore;

/// Note operations on behalf of an authenticated user.
#[derive(Debug, Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    /// Creates a new `NoteService`.
    #[must_use]
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// Creates a note owned by `owner`. Missing content is stored as "".
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a blank title, or a storage error.
    pub async fn create_note(
        &self,
        owner: &UserId,
        title: &str,
        content: Option<String>,
    ) -> Result<Note, ApiError> {
        validate_title(title)?;
        let note = self
            .store
            .save_note(Note::new(owner.clone(), title, content))
            .await?;

        tracing::info!(note_id = %note.id, user_id = %owner, "note created");
        Ok(note)
    }

    /// Lists the notes of `owner`, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns a storage error on medium failure.
    pub async fn list_notes(&self, owner: &UserId) -> Result<Vec<Note>, ApiError> {
        Ok(self.store.get_notes_by_user_id(owner).await?)
    }

    /// Fetches one note, checking that `owner` owns it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the note does not exist and
    /// [`ApiError::Forbidden`] if it belongs to someone else.
    pub async fn get_note(&self, id: &NoteId, owner: &UserId) -> Result<Note, ApiError> {
        let note = self
            .store
            .get_note_by_id(id)
            .await?
            .ok_or_else(|| note_not_found(id))?;

        if !note.is_owned_by(owner) {
            tracing::debug!(note_id = %id, user_id = %owner, "foreign note access denied");
            return Err(ApiError::Forbidden(
                "you do not have permission to access this note".to_string(),
            ));
        }
        Ok(note)
    }

    /// Replaces title and content of an owned note.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`], [`ApiError::NotFound`] or
    /// [`ApiError::Forbidden`], or a storage error.
    pub async fn update_note(
        &self,
        id: &NoteId,
        owner: &UserId,
        title: &str,
        content: Option<String>,
    ) -> Result<Note, ApiError> {
        validate_title(title)?;
        self.get_note(id, owner).await?;

        let content = content.unwrap_or_default();
        let note = self
            .store
            .update_note(id, title, &content)
            .await?
            .ok_or_else(|| note_not_found(id))?;

        tracing::info!(note_id = %id, "note updated");
        Ok(note)
    }

    /// Deletes an owned note.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] or [`ApiError::Forbidden`], or a
    /// storage error.
    pub async fn delete_note(&self, id: &NoteId, owner: &UserId) -> Result<(), ApiError> {
        self.get_note(id, owner).await?;

        if !self.store.delete_note(id).await? {
            return Err(note_not_found(id));
        }

        tracing::info!(note_id = %id, "note deleted");
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    Ok(())
}

fn note_not_found(id: &NoteId) -> ApiError {
    ApiError::NotFound(format!("note {id}"))
}
