//! Domain layer: the two entity shapes the service stores.
//!
//! [`User`] and [`Note`] are plain records keyed by opaque string
//! identifiers. Neither type knows how it is persisted.

pub mod ids;
pub mod note;
pub mod user;

use chrono::{DateTime, SubsecRound, Utc};

pub use ids::{NoteId, UserId};
pub use note::Note;
pub use user::{User, UserProfile};

/// Current time truncated to millisecond precision.
///
/// Both backends observe the same precision this way: the SQLite backend
/// persists timestamps as ISO-8601 text with milliseconds.
#[must_use]
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
