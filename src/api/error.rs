use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AuthError, CatalogError, FavoriteError, UserError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ExternalApiError { service: String, message: String },

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    /// No usable credentials were presented.
    Unauthorized(String),

    /// Credentials were presented but do not grant access.
    Forbidden(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ExternalApiError { service, message } => {
                write!(f, "{service} error: {message}")
            }
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{service} service is unavailable"),
                )
            }
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => Self::not_found("User", id),
            UserError::DuplicateEmail(_) => Self::Conflict("Email is already registered".to_string()),
            UserError::Validation(msg) => Self::ValidationError(msg),
            UserError::Password(e) => Self::InternalError(e.to_string()),
            UserError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<FavoriteError> for ApiError {
    fn from(err: FavoriteError) -> Self {
        match err {
            FavoriteError::FavoriteNotFound(_)
            | FavoriteError::ListNotFound(_)
            | FavoriteError::MissingFavorites(_) => Self::NotFound(err.to_string()),
            FavoriteError::AlreadyFavorited(_) => Self::Conflict(err.to_string()),
            FavoriteError::Validation(msg) => Self::ValidationError(msg),
            FavoriteError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken => Self::invalid_token(),
            AuthError::User(e) => e.into(),
            AuthError::Password(e) => Self::InternalError(e.to_string()),
            AuthError::Token(msg) => Self::InternalError(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Upstream { status: 404 } => {
                Self::NotFound("Catalog entry not found".to_string())
            }
            other => Self::catalog_error(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    pub fn catalog_error(msg: impl Into<String>) -> Self {
        Self::ExternalApiError {
            service: "Catalog".to_string(),
            message: msg.into(),
        }
    }

    pub fn token_required() -> Self {
        Self::Unauthorized("Access Token Required".to_string())
    }

    pub fn invalid_token() -> Self {
        Self::Forbidden("Invalid Access Token".to_string())
    }

    pub fn invalid_credentials() -> Self {
        Self::Unauthorized("Invalid credentials".to_string())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("Unauthorized".to_string())
    }
}
