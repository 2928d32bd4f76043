//! Type-safe opaque identifiers.
//!
//! [`UserId`] and [`NoteId`] wrap the string form of a UUID v4 so the two
//! kinds of identity cannot be confused with each other. They are stored as
//! `TEXT` primary keys by the SQLite backend and used as map keys by the
//! in-memory backend. Identifiers arriving from clients are accepted as-is;
//! an unknown id simply never matches a stored record.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the identifier, returning the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

opaque_id!(
    /// Unique identifier of a registered user. Immutable after creation.
    UserId
);

opaque_id!(
    /// Unique identifier of a note. Immutable after creation.
    NoteId
);

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(UserId::new(), UserId::new());
        assert_ne!(NoteId::new(), NoteId::new());
    }

    #[test]
    fn display_is_uuid_format() {
        let id = NoteId::new();
        let s = id.to_string();
        assert_eq!(s.len(), 36);
        assert!(uuid::Uuid::parse_str(&s).is_ok());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UserId::from("abc-123");
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"abc-123\"");
    }

    #[test]
    fn foreign_ids_are_accepted_verbatim() {
        let id = NoteId::from("not-a-uuid".to_string());
        assert_eq!(id.as_str(), "not-a-uuid");
        assert_eq!(id.into_inner(), "not-a-uuid");
    }
}
