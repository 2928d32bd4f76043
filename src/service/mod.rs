//! Service layer: business rules above the storage contract.
//!
//! [`UserService`] owns registration and credential checks;
//! [`NoteService`] enforces note ownership, which the store itself never
//! checks.

pub mod note_service;
pub mod user_service;

pub use note_service::NoteService;
pub use user_service::UserService;
