//! Domain service for authentication.
//!
//! Handles login, self-registration and resolving a bearer token back to the
//! account it was issued for.

use serde::Serialize;
use thiserror::Error;

use crate::models::{NewUser, User};
use crate::security::{PasswordError, TokenError};
use crate::services::user_service::UserError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The token failed verification. The cause is deliberately not kept.
    #[error("Invalid access token")]
    InvalidToken,

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken => Self::InvalidToken,
            TokenError::Signing(msg) => Self::Token(msg),
        }
    }
}

/// A signed-in account and the access token issued for it.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Checks credentials and issues a token.
    ///
    /// Returns `Ok(None)` for an unknown email and for a wrong password alike;
    /// both paths run one full password verification.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthSession>, AuthError>;

    /// Creates a non-admin account and signs it in.
    async fn register(&self, new_user: NewUser) -> Result<AuthSession, AuthError>;

    /// Verifies `token` and loads the account named by its claim.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the token does not verify.
    /// A valid token for a deleted account yields `Ok(None)`.
    async fn resolve_token(&self, token: &str) -> Result<Option<User>, AuthError>;
}
