use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task;

use crate::config::SecurityConfig;

/// Plaintext hashed once at startup so that a login for an unknown account
/// still pays for one full verification.
const DUMMY_PASSWORD: &str = "marquee-dummy-password";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Invalid Argon2 params: {0}")]
    Params(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Malformed password hash: {0}")]
    Decoding(String),

    #[error("Password task failed: {0}")]
    Join(String),
}

/// Argon2id hasher. Each hash carries its own random salt and parameters in
/// PHC string form, so verification never needs the current config.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    pub fn new(config: &SecurityConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| PasswordError::Params(e.to_string()))?;

        let dummy_hash = hash_with(&params, DUMMY_PASSWORD)?;

        Ok(Self {
            params,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Hashes on the blocking pool; Argon2 is CPU and memory bound.
    pub async fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let params = self.params.clone();
        let plaintext = plaintext.to_string();

        task::spawn_blocking(move || hash_with(&params, &plaintext))
            .await
            .map_err(|e| PasswordError::Join(e.to_string()))?
    }

    /// Returns `Ok(false)` on mismatch. Only a malformed `hashed` value is an error.
    pub async fn verify(&self, hashed: &str, plaintext: &str) -> Result<bool, PasswordError> {
        let hashed = hashed.to_string();
        let plaintext = plaintext.to_string();

        task::spawn_blocking(move || verify_blocking(&hashed, &plaintext))
            .await
            .map_err(|e| PasswordError::Join(e.to_string()))?
    }

    /// Runs a verification whose result is discarded. Used on the
    /// unknown-account login path to match the cost of a real check.
    pub async fn verify_dummy(&self, plaintext: &str) {
        let hashed = self.dummy_hash.to_string();
        let _ = self.verify(&hashed, plaintext).await;
    }
}

fn hash_with(params: &Params, plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone());

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

fn verify_blocking(hashed: &str, plaintext: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hashed).map_err(|e| PasswordError::Decoding(e.to_string()))?;

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Decoding(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };
        PasswordHasher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn hash_then_verify_accepts_same_password() {
        let hasher = fast_hasher();
        for password in ["secret1", "correct horse battery staple", "ünïcødé-🔑", ""] {
            let hashed = hasher.hash(password).await.unwrap();
            assert!(hasher.verify(&hashed, password).await.unwrap());
        }
    }

    #[tokio::test]
    async fn hashing_is_salted() {
        let hasher = fast_hasher();
        let first = hasher.hash("secret1").await.unwrap();
        let second = hasher.hash("secret1").await.unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_without_error() {
        let hasher = fast_hasher();
        let hashed = hasher.hash("secret1").await.unwrap();

        assert!(!hasher.verify(&hashed, "secret2").await.unwrap());
        assert!(!hasher.verify(&hashed, "Secret1").await.unwrap());
        assert!(!hasher.verify(&hashed, "").await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_a_decoding_error() {
        let hasher = fast_hasher();
        let result = hasher.verify("not-a-phc-string", "secret1").await;
        assert!(matches!(result, Err(PasswordError::Decoding(_))));
    }

    #[tokio::test]
    async fn verification_uses_embedded_params() {
        let hashed = fast_hasher().hash("secret1").await.unwrap();

        let stronger = PasswordHasher::new(&SecurityConfig {
            argon2_memory_cost_kib: 2048,
            argon2_time_cost: 2,
            ..SecurityConfig::default()
        })
        .unwrap();

        assert!(stronger.verify(&hashed, "secret1").await.unwrap());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1,
            ..SecurityConfig::default()
        };
        assert!(matches!(
            PasswordHasher::new(&config),
            Err(PasswordError::Params(_))
        ));
    }
}
