//! Note record owned by exactly one user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{NoteId, UserId, now_millis};

/// A single note.
///
/// `id`, `user_id` and `created_at` never change. `title` and `content` are
/// replaced together by [`Note::update`], which also refreshes `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Note {
    /// Unique note identifier.
    pub id: NoteId,
    /// Owner of the note.
    pub user_id: UserId,
    /// Non-empty title.
    pub title: String,
    /// Body text; empty when not provided.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last title/content change.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note for `user_id`. Both timestamps start out equal.
    #[must_use]
    pub fn new(user_id: UserId, title: impl Into<String>, content: Option<String>) -> Self {
        let now = now_millis();
        Self {
            id: NoteId::new(),
            user_id,
            title: title.into(),
            content: content.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces title and content in place and refreshes `updated_at`.
    pub fn update(&mut self, title: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self.content = content.into();
        self.updated_at = now_millis().max(self.created_at);
        self
    }

    /// Returns `true` if `user_id` owns this note.
    #[must_use]
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn new_note_defaults_content_to_empty() {
        let note = Note::new(UserId::new(), "Shopping", None);
        assert_eq!(note.content, "");
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn update_refreshes_timestamp() {
        let mut note = Note::new(UserId::new(), "Shopping", Some("milk".to_string()));
        std::thread::sleep(Duration::from_millis(5));
        note.update("Groceries", "eggs");
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "eggs");
        assert!(note.updated_at > note.created_at);
    }

    #[test]
    fn ownership_check() {
        let owner = UserId::new();
        let note = Note::new(owner.clone(), "t", None);
        assert!(note.is_owned_by(&owner));
        assert!(!note.is_owned_by(&UserId::new()));
    }
}
