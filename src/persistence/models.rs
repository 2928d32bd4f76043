//! Database row models for the `users` and `notes` tables.
//!
//! Timestamps are stored as ISO-8601 text with millisecond precision and a
//! `Z` suffix (e.g. `2024-03-01T12:00:00.123Z`), which sorts correctly as a
//! plain string.

use chrono::{DateTime, SecondsFormat, Utc};

use super::StoreError;
use crate::domain::{Note, User};

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// Primary key.
    pub id: String,
    /// Username as registered.
    pub username: String,
    /// PHC password hash.
    pub password: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
}

/// A row from the `notes` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteRow {
    /// Primary key.
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// Note title.
    pub title: String,
    /// Note body; nullable in the schema.
    pub content: Option<String>,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    /// ISO-8601 last-update timestamp.
    pub updated_at: String,
}

/// Renders a timestamp in the persisted text format.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a persisted timestamp.
///
/// # Errors
///
/// Returns [`StoreError::CorruptRow`] if `raw` is not valid RFC 3339.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::CorruptRow(format!("invalid timestamp {raw:?}: {e}")))
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            username: row.username,
            password_hash: row.password,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

impl TryFrom<NoteRow> for Note {
    type Error = StoreError;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            user_id: row.user_id.into(),
            title: row.title,
            content: row.content.unwrap_or_default(),
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }
}
