//! # notes-api
//!
//! Multi-tenant notes REST service. Users register, log in, and manage
//! their own notes; every note operation is scoped to its owner.
//!
//! Two choices are made once at startup and never revisited: the storage
//! backend (in-memory or SQLite) and the authentication strategy (signed
//! bearer tokens or server-side sessions). Handlers see neither choice
//! directly.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── require_auth guard (auth/)  ── AuthStrategy: token | session
//!     │
//!     ├── UserService, NoteService (service/)
//!     │
//!     ├── NoteStore trait (persistence/)
//!     │
//!     └── MemoryStore | SqliteStore
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
