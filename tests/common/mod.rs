//! Helpers shared by the end-to-end tests: boot a real listener on an
//! ephemeral port and hand back its base URL.

#![allow(dead_code, clippy::panic)]

use std::path::Path;

use notes_api::api::build_router;
use notes_api::app_state::AppState;
use notes_api::config::NotesConfig;
use notes_api::persistence::StorageKind;

/// Builds a configuration for tests without touching the process environment.
pub fn config(auth_mode: &str, storage: StorageKind, db_path: Option<&Path>) -> NotesConfig {
    let storage = storage.as_str().to_string();
    let db_path = db_path.map(|p| p.display().to_string());
    let lookup = move |key: &str| match key {
        "LISTEN_ADDR" => Some("127.0.0.1:0".to_string()),
        "AUTH_MODE" => Some(auth_mode.to_string()),
        "STORAGE_TYPE" => Some(storage.clone()),
        "DB_PATH" => db_path.clone(),
        "JWT_SECRET" => Some("end-to-end-secret".to_string()),
        _ => None,
    };
    let Ok(config) = NotesConfig::from_lookup(lookup) else {
        panic!("test configuration must load");
    };
    config
}

/// Starts the service in the background and returns `http://addr`.
pub async fn spawn(config: &NotesConfig) -> String {
    let Ok(state) = AppState::from_config(config).await else {
        panic!("failed to build application state");
    };
    let Ok(listener) = tokio::net::TcpListener::bind(config.listen_addr).await else {
        panic!("failed to bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no local address");
    };

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, build_router(state)).await {
            panic!("server error: {e}");
        }
    });

    format!("http://{addr}")
}
