//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Unset or unparsable values fall back
//! to defaults; only the listen address is fatal when malformed.
//!
//! | Variable                   | Default                   |
//! |----------------------------|---------------------------|
//! | `LISTEN_ADDR`              | `0.0.0.0:$PORT`           |
//! | `PORT`                     | `3000`                    |
//! | `STORAGE_TYPE`             | `memory`                  |
//! | `DB_PATH`                  | `./data/database.sqlite`  |
//! | `DATABASE_MAX_CONNECTIONS` | `5`                       |
//! | `AUTH_MODE`                | `stateless`               |
//! | `JWT_SECRET`               | development secret        |
//! | `JWT_EXPIRATION`           | `86400`                   |
//! | `SESSION_MAX_AGE_SECS`     | `86400`                   |
//! | `SESSION_SECURE`           | `false`                   |
//! | `LOG_FORMAT`               | `text`                    |

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

use crate::auth::{AuthMode, AuthSettings};
use crate::persistence::{StorageKind, StorageSettings};

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`NotesConfig::from_env`].
#[derive(Debug, Clone)]
pub struct NotesConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Storage backend selection.
    pub storage: StorageSettings,

    /// Authentication strategy selection.
    pub auth: AuthSettings,

    /// Log output format.
    pub log_format: LogFormat,
}

impl NotesConfig {
    /// Loads configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` (or the address built from `PORT`)
    /// cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`NotesConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let raw_addr = env.get("LISTEN_ADDR").unwrap_or_else(|| {
            let port: u16 = env.parse("PORT", 3000);
            format!("0.0.0.0:{port}")
        });
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .with_context(|| format!("invalid listen address: {raw_addr}"))?;

        let defaults = StorageSettings::default();
        let storage = StorageSettings {
            kind: env.parse_enum("STORAGE_TYPE", StorageKind::default()),
            sqlite_path: env
                .get("DB_PATH")
                .map_or(defaults.sqlite_path, PathBuf::from),
            max_connections: env.parse("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
        };

        let defaults = AuthSettings::default();
        let auth = AuthSettings {
            mode: env.parse_enum("AUTH_MODE", AuthMode::default()),
            jwt_secret: env
                .get("JWT_SECRET")
                .unwrap_or_else(|| defaults.jwt_secret.clone()),
            jwt_ttl_secs: env.parse("JWT_EXPIRATION", defaults.jwt_ttl_secs),
            session_max_age_secs: env.parse("SESSION_MAX_AGE_SECS", defaults.session_max_age_secs),
            session_secure: env.parse_bool("SESSION_SECURE", defaults.session_secure),
        };
        if auth.jwt_secret == defaults.jwt_secret && auth.mode == AuthMode::Stateless {
            tracing::warn!("JWT_SECRET is not set, using the built-in development secret");
        }

        let log_format = env.parse_enum("LOG_FORMAT", LogFormat::default());

        Ok(Self {
            listen_addr,
            storage,
            auth,
            log_format,
        })
    }
}

/// Typed accessors over a key lookup.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Returns the trimmed, non-empty value of `key`.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parses `key` as `T`, returning `default` on missing or invalid values.
    fn parse<T: FromStr>(&self, key: &str, default: T) -> T {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    /// Like [`Env::parse`], but warns when a present value is not recognized.
    fn parse_enum<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + fmt::Debug,
        T::Err: fmt::Display,
    {
        let Some(raw) = self.get(key) else {
            return default;
        };
        raw.parse().unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, fallback = ?default, "unrecognized value, using default");
            default
        })
    }

    /// Parses `key` as a boolean. Accepts `true`/`1`/`false`/`0`
    /// (case-insensitive). Returns `default` otherwise.
    fn parse_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("true" | "1") => true,
            Some("false" | "0") => false,
            _ => default,
        }
    }
}
