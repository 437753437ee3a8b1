//! `SeaORM` implementation of the `FavoriteService` trait.

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::info;

use crate::db::{MovieListRowChanges, Store, is_unique_violation};
use crate::models::{Favorite, MovieList, MovieListChanges, NewFavorite, NewMovieList};
use crate::services::favorite_service::{DeleteResult, FavoriteError, FavoriteService};

const MAX_TITLE_LEN: usize = 500;
const MAX_THUMBNAIL_LEN: usize = 2048;
const MAX_LIST_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 2000;

pub struct SeaOrmFavoriteService {
    store: Store,
}

impl SeaOrmFavoriteService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Fails with the ids from `movie_ids` the user has not favorited.
    async fn ensure_favorited(&self, user_id: i32, movie_ids: &[i64]) -> Result<(), FavoriteError> {
        let found: HashSet<i64> = self
            .store
            .favorites()
            .find_many(user_id, movie_ids)
            .await?
            .into_iter()
            .map(|f| f.movie_id)
            .collect();

        let mut missing: Vec<i64> = movie_ids
            .iter()
            .copied()
            .filter(|id| !found.contains(id))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            missing.sort_unstable();
            missing.dedup();
            Err(FavoriteError::MissingFavorites(missing))
        }
    }
}

fn validate_favorite(favorite: &NewFavorite) -> Result<(), FavoriteError> {
    if favorite.movie_id <= 0 {
        return Err(FavoriteError::Validation(format!(
            "Invalid movie ID: {}. ID must be a positive integer",
            favorite.movie_id
        )));
    }
    if favorite.title.trim().is_empty() {
        return Err(FavoriteError::Validation("Title is required".to_string()));
    }
    if favorite.title.len() > MAX_TITLE_LEN {
        return Err(FavoriteError::Validation("Title is too long".to_string()));
    }
    if favorite.thumbnail.len() > MAX_THUMBNAIL_LEN {
        return Err(FavoriteError::Validation("Thumbnail is too long".to_string()));
    }
    Ok(())
}

fn validate_list_name(name: &str) -> Result<String, FavoriteError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FavoriteError::Validation("List name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_LIST_NAME_LEN {
        return Err(FavoriteError::Validation(format!(
            "List name must be {MAX_LIST_NAME_LEN} characters or less"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_description(description: Option<String>) -> Result<Option<String>, FavoriteError> {
    let description = description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    if description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
    {
        return Err(FavoriteError::Validation(format!(
            "Description must be {MAX_DESCRIPTION_LEN} characters or less"
        )));
    }
    Ok(description)
}

#[async_trait]
impl FavoriteService for SeaOrmFavoriteService {
    async fn get_by_user(&self, user_id: i32) -> Result<Vec<Favorite>, FavoriteError> {
        Ok(self.store.favorites().list_for_user(user_id).await?)
    }

    async fn get(&self, user_id: i32, movie_id: i64) -> Result<Favorite, FavoriteError> {
        self.store
            .favorites()
            .get(user_id, movie_id)
            .await?
            .ok_or(FavoriteError::FavoriteNotFound(movie_id))
    }

    async fn add(&self, user_id: i32, favorite: NewFavorite) -> Result<Favorite, FavoriteError> {
        validate_favorite(&favorite)?;
        let movie_id = favorite.movie_id;

        let created = self
            .store
            .favorites()
            .insert(user_id, favorite)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    FavoriteError::AlreadyFavorited(movie_id)
                } else {
                    e.into()
                }
            })?;

        info!(user_id, movie_id, "Favorite added");
        Ok(created)
    }

    async fn delete(&self, movie_id: i64, user_id: i32) -> Result<DeleteResult, FavoriteError> {
        let affected = self.store.favorites().delete(user_id, movie_id).await?;
        if affected > 0 {
            info!(user_id, movie_id, "Favorite removed");
        }
        Ok(DeleteResult { affected })
    }

    async fn get_lists(&self, user_id: i32) -> Result<Vec<MovieList>, FavoriteError> {
        Ok(self.store.movie_lists().list_for_user(user_id).await?)
    }

    async fn get_list(&self, list_id: i32, user_id: i32) -> Result<MovieList, FavoriteError> {
        self.store
            .movie_lists()
            .get_for_user(list_id, user_id)
            .await?
            .ok_or(FavoriteError::ListNotFound(list_id))
    }

    async fn create_list(
        &self,
        user_id: i32,
        list: NewMovieList,
    ) -> Result<MovieList, FavoriteError> {
        let name = validate_list_name(&list.name)?;
        let description = normalize_description(list.description)?;
        self.ensure_favorited(user_id, &list.movie_ids).await?;

        let created = self
            .store
            .movie_lists()
            .create(user_id, name, description, &list.movie_ids)
            .await?;

        info!(user_id, list_id = created.id, "Movie list created");
        Ok(created)
    }

    async fn update_list(
        &self,
        list_id: i32,
        user_id: i32,
        changes: MovieListChanges,
    ) -> Result<MovieList, FavoriteError> {
        let name = changes.name.as_deref().map(validate_list_name).transpose()?;
        let description = changes
            .description
            .map(normalize_description)
            .transpose()?;
        if let Some(movie_ids) = &changes.movie_ids {
            self.ensure_favorited(user_id, movie_ids).await?;
        }

        self.store
            .movie_lists()
            .update(
                list_id,
                user_id,
                MovieListRowChanges {
                    name,
                    description,
                    movie_ids: changes.movie_ids,
                },
            )
            .await?
            .ok_or(FavoriteError::ListNotFound(list_id))
    }

    async fn delete_list(&self, list_id: i32, user_id: i32) -> Result<DeleteResult, FavoriteError> {
        let affected = self.store.movie_lists().delete(list_id, user_id).await?;
        if affected > 0 {
            info!(user_id, list_id, "Movie list deleted");
        }
        Ok(DeleteResult { affected })
    }

    async fn add_to_list(
        &self,
        list_id: i32,
        user_id: i32,
        movie_id: i64,
    ) -> Result<(), FavoriteError> {
        self.get_list(list_id, user_id).await?;
        self.get(user_id, movie_id).await?;

        self.store
            .movie_lists()
            .add_item(list_id, user_id, movie_id)
            .await?;
        Ok(())
    }

    async fn remove_from_list(
        &self,
        list_id: i32,
        user_id: i32,
        movie_id: i64,
    ) -> Result<DeleteResult, FavoriteError> {
        self.get_list(list_id, user_id).await?;

        let affected = self
            .store
            .movie_lists()
            .remove_item(list_id, user_id, movie_id)
            .await?;
        Ok(DeleteResult { affected })
    }
}
