use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::validate_user_id;
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::{NewUser, User, UserChanges};

/// GET /users (admin)
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    caller.require_admin()?;
    let users = state.users().get_all().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// POST /users (admin)
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    ApiJson(payload): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    caller.require_admin()?;
    let user = state.users().create(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// GET /users/me
pub async fn current_user(AuthUser(user): AuthUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::success(user))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _caller: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = validate_user_id(id)?;
    let user = state
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(user)))
}

/// PUT /users/{id}
///
/// Self or admin. Only an admin may touch `isAdmin`.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i32>,
    ApiJson(changes): ApiJson<UserChanges>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = validate_user_id(id)?;
    caller.require_self_or_admin(id)?;

    if changes.is_admin.is_some() {
        caller.require_admin()?;
    }
    if changes.is_empty() {
        return Err(ApiError::validation("No changes provided"));
    }

    let user = state.users().update(id, changes).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_user_id(id)?;
    caller.require_self_or_admin(id)?;

    state.users().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
