use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::SecurityConfig;

/// Access token claims. The email is the only identity assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed input and expiry all collapse into this.
    #[error("Invalid access token")]
    InvalidToken,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 access tokens with a fixed lifetime.
///
/// There is no revocation: a token stays valid until `exp`, whatever happens
/// to the account in the meantime.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            Duration::hours(i64::from(config.token_ttl_hours)),
        )
    }

    pub fn issue(&self, email: &str) -> Result<String, TokenError> {
        self.issue_at(email, Utc::now())
    }

    /// Issues a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, email: &str, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(kind = ?e.kind(), "Access token rejected");
                TokenError::InvalidToken
            })
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish()
    }
}
