//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::AuthStrategy;
use crate::config::NotesConfig;
use crate::persistence::{self, NoteStore, StoreError};
use crate::service::{NoteService, UserService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Every field points at the single store built at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Account registration and lookup.
    pub users: Arc<UserService>,
    /// Ownership-checked note operations.
    pub notes: Arc<NoteService>,
    /// Authentication strategy chosen for this process.
    pub auth: Arc<AuthStrategy>,
    /// The storage backend, for status reporting.
    pub store: Arc<dyn NoteStore>,
}

impl AppState {
    /// Wires services around an existing store.
    #[must_use]
    pub fn new(store: Arc<dyn NoteStore>, auth: AuthStrategy) -> Self {
        Self {
            users: Arc::new(UserService::new(Arc::clone(&store))),
            notes: Arc::new(NoteService::new(Arc::clone(&store))),
            auth: Arc::new(auth),
            store,
        }
    }

    /// Builds the store and auth strategy named by `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the storage backend cannot be opened.
    pub async fn from_config(config: &NotesConfig) -> Result<Self, StoreError> {
        let store = persistence::build_store(&config.storage).await?;
        let auth = AuthStrategy::from_settings(&config.auth);
        Ok(Self::new(store, auth))
    }
}
