use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{validate_list_id, validate_movie_id};
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::models::{MovieList, MovieListChanges, NewMovieList};

/// GET /lists
pub async fn list_lists(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<Vec<MovieList>>>, ApiError> {
    let lists = state.favorites().get_lists(user.id).await?;
    Ok(Json(ApiResponse::success(lists)))
}

/// POST /lists
pub async fn create_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<NewMovieList>,
) -> Result<(StatusCode, Json<ApiResponse<MovieList>>), ApiError> {
    let list = state.favorites().create_list(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(list))))
}

/// GET /lists/{id}
pub async fn get_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MovieList>>, ApiError> {
    let id = validate_list_id(id)?;
    let list = state.favorites().get_list(id, user.id).await?;
    Ok(Json(ApiResponse::success(list)))
}

/// PUT /lists/{id}
pub async fn update_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    ApiJson(changes): ApiJson<MovieListChanges>,
) -> Result<Json<ApiResponse<MovieList>>, ApiError> {
    let id = validate_list_id(id)?;
    let list = state.favorites().update_list(id, user.id, changes).await?;
    Ok(Json(ApiResponse::success(list)))
}

/// DELETE /lists/{id}
pub async fn delete_list(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_list_id(id)?;
    let result = state.favorites().delete_list(id, user.id).await?;

    if result.is_deleted() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("List", id))
    }
}

/// POST /lists/{id}/movies/{movie_id}
pub async fn add_list_movie(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, movie_id)): Path<(i32, i64)>,
) -> Result<StatusCode, ApiError> {
    let id = validate_list_id(id)?;
    let movie_id = validate_movie_id(movie_id)?;

    state.favorites().add_to_list(id, user.id, movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /lists/{id}/movies/{movie_id}
pub async fn remove_list_movie(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((id, movie_id)): Path<(i32, i64)>,
) -> Result<StatusCode, ApiError> {
    let id = validate_list_id(id)?;
    let movie_id = validate_movie_id(movie_id)?;

    let result = state
        .favorites()
        .remove_from_list(id, user.id, movie_id)
        .await?;

    if result.is_deleted() {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "Movie {movie_id} is not in list {id}"
        )))
    }
}
