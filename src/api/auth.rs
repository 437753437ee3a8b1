use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use super::{ApiError, ApiJson, ApiResponse, AppState, LoginRequest, RegisterRequest};
use crate::models::{NewUser, User};
use crate::services::AuthSession;

// ============================================================================
// Middleware
// ============================================================================

/// Guards protected routes.
///
/// 1. No `Authorization: Bearer <token>` header: 401.
/// 2. Token fails verification: 403.
/// 3. Token names an account that no longer exists: 403.
///
/// On success the resolved [`User`] is stored in the request extensions for
/// the [`AuthUser`] extractor.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        reject("missing");
        return Err(ApiError::token_required());
    };

    let user = match state.auth().resolve_token(token).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            reject("unknown_user");
            warn!("Valid access token for an account that no longer exists");
            return Err(ApiError::invalid_token());
        }
        Err(crate::services::AuthError::InvalidToken) => {
            reject("invalid");
            return Err(ApiError::invalid_token());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn reject(reason: &'static str) {
    metrics::counter!("auth_gate_rejections_total", "reason" => reason).increment(1);
}

/// Extracts the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

// ============================================================================
// Extractor
// ============================================================================

/// The account resolved by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub const fn is_admin(&self) -> bool {
        self.0.is_admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden())
        }
    }

    /// Allows the account itself or any admin.
    pub fn require_self_or_admin(&self, user_id: i32) -> Result<(), ApiError> {
        if self.0.id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden())
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(Self)
            .ok_or_else(ApiError::token_required)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthSession>>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    state
        .auth()
        .authenticate(&payload.email, &payload.password)
        .await?
        .map(|session| Json(ApiResponse::success(session)))
        .ok_or_else(ApiError::invalid_credentials)
}

/// POST /register
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthSession>>), ApiError> {
    let session = state
        .auth()
        .register(NewUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            is_admin: false,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(session))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer   abc ")), Some("abc"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    fn user(id: i32, is_admin: bool) -> AuthUser {
        AuthUser(User {
            id,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            is_admin,
            created_at: String::new(),
            updated_at: String::new(),
        })
    }

    #[test]
    fn self_or_admin() {
        assert!(user(1, false).require_self_or_admin(1).is_ok());
        assert!(user(1, false).require_self_or_admin(2).is_err());
        assert!(user(1, true).require_self_or_admin(2).is_ok());
        assert!(user(1, false).require_admin().is_err());
        assert!(user(1, true).require_admin().is_ok());
    }
}
