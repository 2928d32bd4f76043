//! In-memory storage backend.
//!
//! [`MemoryStore`] keeps users and notes in two `HashMap`s behind a single
//! [`tokio::sync::RwLock`]. Every operation completes under one lock
//! acquisition, so no caller can observe a half-applied write. Nothing
//! survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{NoteStore, StorageKind, StoreError};
use crate::domain::{Note, NoteId, User, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    notes: HashMap<NoteId, Note>,
}

/// Volatile [`NoteStore`] backed by keyed maps.
///
/// This is the reference implementation of the storage contract: the SQLite
/// backend is expected to behave identically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        tracing::debug!("initialized in-memory storage");
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn save_user(&self, user: User) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user {} already exists", user.id)));
        }
        if tables
            .users
            .values()
            .any(|existing| existing.username_matches(&user.username))
        {
            return Err(StoreError::Conflict("username already exists".to_string()));
        }
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username_matches(username))
            .cloned())
    }

    async fn save_note(&self, note: Note) -> Result<Note, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.notes.contains_key(&note.id) {
            return Err(StoreError::Conflict(format!("note {} already exists", note.id)));
        }
        tables.notes.insert(note.id.clone(), note.clone());
        Ok(note)
    }

    async fn get_note_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        Ok(self.tables.read().await.notes.get(id).cloned())
    }

    async fn get_notes_by_user_id(&self, user_id: &UserId) -> Result<Vec<Note>, StoreError> {
        let tables = self.tables.read().await;
        let mut notes: Vec<Note> = tables
            .notes
            .values()
            .filter(|note| note.is_owned_by(user_id))
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; match the SQL ORDER BY.
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    async fn update_note(
        &self,
        id: &NoteId,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .notes
            .get_mut(id)
            .map(|note| note.update(title, content).clone()))
    }

    async fn delete_note(&self, id: &NoteId) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.notes.remove(id).is_some())
    }

    async fn clear_all(&self) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        tables.notes.clear();
        tables.users.clear();
        Ok(true)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }
}
