use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::validate_movie_id;
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::{Favorite, NewFavorite};

/// GET /favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<Vec<Favorite>>>, ApiError> {
    let favorites = state.favorites().get_by_user(user.id).await?;
    Ok(Json(ApiResponse::success(favorites)))
}

/// GET /favorites/{movie_id}
pub async fn get_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(movie_id): Path<i64>,
) -> Result<Json<ApiResponse<Favorite>>, ApiError> {
    let movie_id = validate_movie_id(movie_id)?;
    let favorite = state.favorites().get(user.id, movie_id).await?;
    Ok(Json(ApiResponse::success(favorite)))
}

/// POST /favorites
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<NewFavorite>,
) -> Result<(StatusCode, Json<ApiResponse<Favorite>>), ApiError> {
    let favorite = state.favorites().add(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(favorite))))
}

/// DELETE /favorites/{movie_id}
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(movie_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let movie_id = validate_movie_id(movie_id)?;
    let result = state.favorites().delete(movie_id, user.id).await?;

    if result.is_deleted() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Favorite", movie_id))
    }
}
