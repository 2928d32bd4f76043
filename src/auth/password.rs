//! Password hashing and verification (Argon2id, PHC string format).
//!
//! Hashing is deliberately expensive, so the async wrappers move the work
//! onto the blocking thread pool instead of stalling a runtime worker.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::ApiError;

/// Hashes `password` with a fresh random salt. Returns a PHC-format string
/// such as `$argon2id$v=19$m=19456,t=2,p=1$...`.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {e}")))
}

/// Checks `password` against a stored PHC hash.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if `hash` is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(format!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking pool.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if hashing fails or the task is cancelled.
pub async fn hash_password_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking pool.
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if the stored hash is malformed or the
/// task is cancelled.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("verification task failed: {e}")))?
}
