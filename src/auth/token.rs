//! Stateless bearer tokens (HS256 JWT).

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::UserId;
use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user id.
    sub: String,
    /// Issued at (unix seconds).
    iat: i64,
    /// Expiry (unix seconds).
    exp: i64,
}

/// Issues and verifies signed tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl_secs: i64,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates an issuer whose tokens expire `ttl_secs` after issue.
    #[must_use]
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    /// Token lifetime in seconds.
    #[must_use]
    pub const fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Signs a token whose subject is `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if encoding fails.
    pub fn issue(&self, user_id: &UserId) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        self.sign(&claims)
    }

    /// Verifies signature and expiry, returning the embedded user id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] for a bad signature, an expired
    /// token, or any malformed input.
    pub fn verify(&self, token: &str) -> Result<UserId, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| UserId::from(data.claims.sub))
        .map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            ApiError::Unauthenticated("invalid or expired token".to_string())
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, ApiError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_subject() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let user_id = UserId::new();
        let Ok(token) = issuer.issue(&user_id) else {
            panic!("issue failed");
        };
        let Ok(subject) = issuer.verify(&token) else {
            panic!("verify failed");
        };
        assert_eq!(subject, user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let Ok(token) = TokenIssuer::new("secret-a", 3600).issue(&UserId::new()) else {
            panic!("issue failed");
        };
        let result = TokenIssuer::new("secret-b", 3600).verify(&token);
        assert!(matches!(result, Err(ApiError::Unauthenticated(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let now = Utc::now().timestamp();
        let Ok(token) = issuer.sign(&Claims {
            sub: UserId::new().to_string(),
            iat: now - 120,
            exp: now - 60,
        }) else {
            panic!("sign failed");
        };
        assert!(matches!(
            issuer.verify(&token),
            Err(ApiError::Unauthenticated(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        assert!(issuer.verify("not.a.jwt").is_err());
        assert!(issuer.verify("").is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", TokenIssuer::new("super-secret", 60));
        assert!(!rendered.contains("super-secret"));
    }
}
