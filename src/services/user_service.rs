//! Domain service for account management.
//!
//! Passwords are hashed here before they reach the store. Authorization
//! (self-or-admin) is the caller's job; this layer only enforces data rules.

use thiserror::Error;

use crate::models::{NewUser, User, UserChanges};
use crate::security::PasswordError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(i32),

    #[error("Email {0} is already registered")]
    DuplicateEmail(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Lists every account, oldest first.
    async fn get_all(&self) -> Result<Vec<User>, UserError>;

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, UserError>;

    /// Looks up by email; the argument is normalized the same way stored
    /// emails are.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Creates an account with a freshly hashed password.
    ///
    /// # Errors
    ///
    /// - [`UserError::Validation`] for a bad name, email or password
    /// - [`UserError::DuplicateEmail`] if the store already holds the email
    async fn create(&self, new_user: NewUser) -> Result<User, UserError>;

    /// Applies a partial update, re-hashing the password when one is given.
    ///
    /// # Errors
    ///
    /// - [`UserError::NotFound`] if no user has this id
    /// - [`UserError::DuplicateEmail`] if the new email is taken
    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, UserError>;

    /// Deletes the account and, through the store, everything it owns.
    async fn delete(&self, id: i32) -> Result<(), UserError>;
}
