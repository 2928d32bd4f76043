//! User account record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{UserId, now_millis};

/// A registered account.
///
/// Created once by registration and never updated afterwards. The password is
/// only ever held as an opaque PHC hash string; it is excluded from every
/// serialized form of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user identifier (immutable after creation).
    pub id: UserId,
    /// Login name. Uniqueness is case-insensitive.
    pub username: String,
    /// Salted one-way hash of the password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a fresh identity and the current timestamp.
    ///
    /// `password_hash` must already be hashed; this constructor never sees
    /// plaintext.
    #[must_use]
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: now_millis(),
        }
    }

    /// Returns the public, password-free view of this user.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }

    /// Case-insensitive username comparison used by every backend.
    ///
    /// Only ASCII letters are folded, the same rule as SQLite's `LOWER()`:
    /// `"Émile"` and `"émile"` are distinct names.
    #[must_use]
    pub fn username_matches(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username)
    }
}

/// Public view of a [`User`], safe to return to clients and to keep in a
/// server-side session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Login name as registered.
    pub username: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_never_serialized() {
        let user = User::new("alice", "$argon2id$v=19$secret");
        let Ok(json) = serde_json::to_value(&user) else {
            panic!("serialization failed");
        };
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn username_match_ignores_case() {
        let user = User::new("Alice", "hash");
        assert!(user.username_matches("alice"));
        assert!(user.username_matches("ALICE"));
        assert!(!user.username_matches("alicia"));
    }

    #[test]
    fn username_match_folds_ascii_only() {
        let user = User::new("Émile", "hash");
        assert!(user.username_matches("ÉMILE"));
        assert!(!user.username_matches("émile"));
    }

    #[test]
    fn profile_copies_public_fields() {
        let user = User::new("bob", "hash");
        let profile = user.profile();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.username, "bob");
        assert_eq!(profile.created_at, user.created_at);
    }
}
