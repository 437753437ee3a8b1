//! Domain service for per-user favorites and named movie lists.
//!
//! Every operation is scoped by the caller's user id; a row owned by someone
//! else is indistinguishable from a missing one.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Favorite, MovieList, MovieListChanges, NewFavorite, NewMovieList};

#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("Movie {0} is not in favorites")]
    FavoriteNotFound(i64),

    #[error("Movie {0} is already in favorites")]
    AlreadyFavorited(i64),

    #[error("List {0} not found")]
    ListNotFound(i32),

    #[error("Movies not in favorites: {0:?}")]
    MissingFavorites(Vec<i64>),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for FavoriteError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Outcome of a scoped delete. `affected == 0` means nothing matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    pub affected: u64,
}

impl DeleteResult {
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        self.affected > 0
    }
}

#[async_trait::async_trait]
pub trait FavoriteService: Send + Sync {
    async fn get_by_user(&self, user_id: i32) -> Result<Vec<Favorite>, FavoriteError>;

    /// # Errors
    ///
    /// Returns [`FavoriteError::FavoriteNotFound`] if the user has not
    /// favorited this movie.
    async fn get(&self, user_id: i32, movie_id: i64) -> Result<Favorite, FavoriteError>;

    /// # Errors
    ///
    /// Returns [`FavoriteError::AlreadyFavorited`] when the store rejects the
    /// (user, movie) pair as a duplicate.
    async fn add(&self, user_id: i32, favorite: NewFavorite) -> Result<Favorite, FavoriteError>;

    /// Deletes the row matching both keys, reporting how many matched.
    async fn delete(&self, movie_id: i64, user_id: i32) -> Result<DeleteResult, FavoriteError>;

    async fn get_lists(&self, user_id: i32) -> Result<Vec<MovieList>, FavoriteError>;

    async fn get_list(&self, list_id: i32, user_id: i32) -> Result<MovieList, FavoriteError>;

    /// # Errors
    ///
    /// Returns [`FavoriteError::MissingFavorites`] if any requested movie is
    /// not one of the user's favorites.
    async fn create_list(
        &self,
        user_id: i32,
        list: NewMovieList,
    ) -> Result<MovieList, FavoriteError>;

    async fn update_list(
        &self,
        list_id: i32,
        user_id: i32,
        changes: MovieListChanges,
    ) -> Result<MovieList, FavoriteError>;

    async fn delete_list(&self, list_id: i32, user_id: i32) -> Result<DeleteResult, FavoriteError>;

    /// Adds one of the user's favorites to the list. Idempotent.
    async fn add_to_list(
        &self,
        list_id: i32,
        user_id: i32,
        movie_id: i64,
    ) -> Result<(), FavoriteError>;

    async fn remove_from_list(
        &self,
        list_id: i32,
        user_id: i32,
        movie_id: i64,
    ) -> Result<DeleteResult, FavoriteError>;
}
