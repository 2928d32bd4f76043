//! SQLite implementation of the storage contract.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::models::{NoteRow, UserRow, format_timestamp};
use super::{NoteStore, StorageKind, StoreError};
use crate::domain::{Note, NoteId, User, UserId, now_millis};

const CREATE_USERS_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        username TEXT UNIQUE NOT NULL,
        password TEXT NOT NULL,
        created_at TEXT NOT NULL
    )";

const CREATE_NOTES_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users (id)
    )";

const NOTE_COLUMNS: &str = "id, user_id, title, content, created_at, updated_at";

/// Durable [`NoteStore`] backed by a single SQLite file via `sqlx::SqlitePool`.
///
/// Foreign-key enforcement is left off: the `notes.user_id` reference is
/// declared but notes are neither rejected for unknown users nor cascaded
/// when a user row disappears, matching the in-memory backend.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and ensures both
    /// tables exist. Safe to call on every startup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the parent directory cannot be created
    /// and [`StoreError::Database`] if the file cannot be opened or the
    /// schema cannot be created.
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self, StoreError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        let store = Self {
            pool,
            path: path.to_path_buf(),
        };
        store.create_tables().await?;

        tracing::info!(path = %path.display(), "connected to SQLite database");
        Ok(store)
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn create_tables(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_NOTES_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

/// Maps unique/primary-key violations to [`StoreError::Conflict`].
fn insert_error(err: sqlx::Error, what: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err
        && db.is_unique_violation()
    {
        return StoreError::Conflict(format!("{what} already exists"));
    }
    StoreError::Database(err)
}

#[async_trait]
impl NoteStore for SqliteStore {
    async fn save_user(&self, user: User) -> Result<User, StoreError> {
        // The UNIQUE constraint on `username` is case-sensitive; the
        // case-folded check runs inside the INSERT so it cannot race.
        let result = sqlx::query(
            "INSERT INTO users (id, username, password, created_at) \
             SELECT ?, ?, ?, ? \
             WHERE NOT EXISTS (SELECT 1 FROM users WHERE LOWER(username) = LOWER(?))",
        )
        .bind(user.id.as_str())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(format_timestamp(&user.created_at))
        .bind(&user.username)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, "user"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict("username already exists".to_string()));
        }
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password, created_at FROM users WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password, created_at FROM users \
             WHERE LOWER(username) = LOWER(?)",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn save_note(&self, note: Note) -> Result<Note, StoreError> {
        sqlx::query(
            "INSERT INTO notes (id, user_id, title, content, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(note.id.as_str())
        .bind(note.user_id.as_str())
        .bind(&note.title)
        .bind(&note.content)
        .bind(format_timestamp(&note.created_at))
        .bind(format_timestamp(&note.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, "note"))?;

        Ok(note)
    }

    async fn get_note_by_id(&self, id: &NoteId) -> Result<Option<Note>, StoreError> {
        sqlx::query_as::<_, NoteRow>(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(Note::try_from)
            .transpose()
    }

    async fn get_notes_by_user_id(&self, user_id: &UserId) -> Result<Vec<Note>, StoreError> {
        let rows = sqlx::query_as::<_, NoteRow>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ? ORDER BY updated_at DESC"
        ))
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Note::try_from).collect()
    }

    async fn update_note(
        &self,
        id: &NoteId,
        title: &str,
        content: &str,
    ) -> Result<Option<Note>, StoreError> {
        let result = sqlx::query(
            "UPDATE notes SET title = ?, content = ?, updated_at = MAX(?, created_at) WHERE id = ?",
        )
        .bind(title)
        .bind(content)
        .bind(format_timestamp(&now_millis()))
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        // Not atomic with the UPDATE: a concurrent delete in between yields None.
        self.get_note_by_id(id).await
    }

    async fn delete_note(&self, id: &NoteId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_all(&self) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM notes").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(true)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Sqlite
    }
}
