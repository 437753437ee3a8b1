use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{favorites, prelude::*};
use crate::models::{Favorite, NewFavorite};

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Favorite>, DbErr> {
        let rows = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_asc(favorites::Column::CreatedAt)
            .order_by_asc(favorites::Column::MovieId)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    pub async fn get(&self, user_id: i32, movie_id: i64) -> Result<Option<Favorite>, DbErr> {
        let row = Favorites::find_by_id((user_id, movie_id))
            .one(&self.conn)
            .await?;

        Ok(row.map(Favorite::from))
    }

    /// Returns the subset of `movie_ids` that the user has favorited.
    pub async fn find_many(&self, user_id: i32, movie_ids: &[i64]) -> Result<Vec<Favorite>, DbErr> {
        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::MovieId.is_in(movie_ids.iter().copied()))
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Favorite::from).collect())
    }

    /// Inserts a favorite; a repeat for the same (user, movie) is a primary key
    /// violation.
    pub async fn insert(&self, user_id: i32, favorite: NewFavorite) -> Result<Favorite, DbErr> {
        let model = favorites::ActiveModel {
            user_id: Set(user_id),
            movie_id: Set(favorite.movie_id),
            title: Set(favorite.title),
            thumbnail: Set(favorite.thumbnail),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        }
        .insert(&self.conn)
        .await?;

        Ok(Favorite::from(model))
    }

    /// Deletes only the row matching both keys.
    pub async fn delete(&self, user_id: i32, movie_id: i64) -> Result<u64, DbErr> {
        let result = Favorites::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::MovieId.eq(movie_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
