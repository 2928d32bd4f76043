//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies default every field so that a missing field reaches
//! validation instead of failing deserialization.

pub mod auth_dto;
pub mod common_dto;
pub mod note_dto;

pub use auth_dto::*;
pub use common_dto::*;
pub use note_dto::*;
