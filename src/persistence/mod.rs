//! Persistence layer: the storage contract and its two backends.
//!
//! [`NoteStore`] is the only way the rest of the crate touches stored users
//! and notes. [`MemoryStore`] keeps everything in process memory and is the
//! reference behavior; [`SqliteStore`] persists to a single SQLite file.
//! [`build_store`] picks one of them once, at startup, from
//! [`StorageSettings`].

pub mod memory;
pub mod models;
pub mod sqlite;

#[cfg(test)]
mod contract;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Note, NoteId, User, UserId};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Failures raised by a storage backend.
///
/// Only [`StoreError::Conflict`] carries meaning for callers; every other
/// variant is an opaque medium failure that is propagated unmodified.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key (record id or case-insensitive username) already exists.
    #[error("{0}")]
    Conflict(String),

    /// The database driver reported an error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem failure while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be converted back into a record.
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

/// Storage contract shared by every backend.
///
/// Both implementations must produce the same observable results for the
/// same sequence of calls (modulo timestamp precision). The contract is
/// ownership-agnostic: it never checks who is calling.
#[async_trait]
pub trait NoteStore: Send + Sync + fmt::Debug {
    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the id or the username (compared
    /// case-insensitively) is already taken. Existing rows are never
    /// overwritten.
    async fn save_user(&self, user: User) -> Result<User, StoreError>;

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on medium failure.
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    /// Looks up a user by username, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on medium failure.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a new note.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if a note with the same id exists.
    async fn save_note(&self, note: Note) -> Result<Note, StoreError>;

    /// Looks up a note by id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on medium failure.
    async fn get_note_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError>;

    /// Returns every note owned by `user_id`, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on medium failure.
    async fn get_notes_by_user_id(&self, user_id: &UserId) -> Result<Vec<Note>, StoreError>;

    /// Replaces title and content of a note and refreshes its `updated_at`.
    ///
    /// Returns `None` if no note has the given id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on medium failure.
    async fn update_note(
        &self,
        id: &NoteId,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, StoreError>;

    /// Removes a note. Returns `true` iff a record existed and was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on medium failure.
    async fn delete_note(&self, id: &NoteId) -> Result<bool, StoreError>;

    /// Wipes all notes and users. Intended for test isolation only.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] encountered; nothing is cleared in
    /// that case.
    async fn clear_all(&self) -> Result<bool, StoreError>;

    /// Which backend this is.
    fn kind(&self) -> StorageKind;
}

/// Closed set of storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Volatile keyed maps, lost on restart.
    #[default]
    Memory,
    /// Single-file SQLite database.
    Sqlite,
}

impl StorageKind {
    /// Configuration string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a storage type string is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown storage type: {0}")]
pub struct UnknownStorageKind(pub String);

impl FromStr for StorageKind {
    type Err = UnknownStorageKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(UnknownStorageKind(other.to_string())),
        }
    }
}

/// Storage selection and backend parameters.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Backend to construct.
    pub kind: StorageKind,
    /// Path of the SQLite database file. Ignored by the memory backend.
    pub sqlite_path: PathBuf,
    /// Maximum SQLite pool connections.
    pub max_connections: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            kind: StorageKind::Memory,
            sqlite_path: PathBuf::from("./data/database.sqlite"),
            max_connections: 5,
        }
    }
}

/// Constructs the backend selected by `settings`.
///
/// Called exactly once during application assembly; the returned store is
/// shared by every request for the lifetime of the process.
///
/// # Errors
///
/// Returns a [`StoreError`] if the SQLite file or its schema cannot be
/// prepared.
pub async fn build_store(settings: &StorageSettings) -> Result<Arc<dyn NoteStore>, StoreError> {
    let store: Arc<dyn NoteStore> = match settings.kind {
        StorageKind::Memory => Arc::new(MemoryStore::new()),
        StorageKind::Sqlite => {
            Arc::new(SqliteStore::open(&settings.sqlite_path, settings.max_connections).await?)
        }
    };
    tracing::info!(storage = %settings.kind, "storage backend ready");
    Ok(store)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn storage_kind_parses_case_insensitively() {
        assert_eq!("SQLite".parse::<StorageKind>().ok(), Some(StorageKind::Sqlite));
        assert_eq!(" memory ".parse::<StorageKind>().ok(), Some(StorageKind::Memory));
        assert!("mongodb".parse::<StorageKind>().is_err());
    }

    #[test]
    fn default_is_memory() {
        assert_eq!(StorageKind::default(), StorageKind::Memory);
        assert_eq!(StorageSettings::default().kind, StorageKind::Memory);
    }

    #[tokio::test]
    async fn build_store_honours_kind() {
        let Ok(store) = build_store(&StorageSettings::default()).await else {
            panic!("memory store cannot fail to build");
        };
        assert_eq!(store.kind(), StorageKind::Memory);
    }
}
