//! Credential primitives: password hashing and access tokens.
//!
//! Both types are built once at startup from [`SecurityConfig`](crate::config::SecurityConfig)
//! and are immutable afterwards, so they can be shared across requests freely.

pub mod password;
pub mod token;

pub use password::{PasswordError, PasswordHasher};
pub use token::{Claims, TokenError, TokenIssuer};
