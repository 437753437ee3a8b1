use std::collections::HashMap;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{favorites, movie_list_items, movie_lists, prelude::*};
use crate::models::{Favorite, MovieList};

/// Column changes for a list update. Membership is replaced wholesale when
/// `movie_ids` is present.
#[derive(Debug, Clone, Default)]
pub struct MovieListRowChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub movie_ids: Option<Vec<i64>>,
}

pub struct MovieListRepository {
    conn: DatabaseConnection,
}

impl MovieListRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<MovieList>, DbErr> {
        let lists = MovieLists::find()
            .filter(movie_lists::Column::UserId.eq(user_id))
            .order_by_asc(movie_lists::Column::Id)
            .all(&self.conn)
            .await?;

        let ids: Vec<i32> = lists.iter().map(|l| l.id).collect();
        let mut members = load_members(&self.conn, user_id, &ids).await?;

        Ok(lists
            .into_iter()
            .map(|list| {
                let movies = members.remove(&list.id).unwrap_or_default();
                MovieList::from_model(list, movies)
            })
            .collect())
    }

    /// Lists owned by someone else are reported as absent.
    pub async fn get_for_user(&self, id: i32, user_id: i32) -> Result<Option<MovieList>, DbErr> {
        find_owned(&self.conn, id, user_id).await
    }

    pub async fn create(
        &self,
        user_id: i32,
        name: String,
        description: Option<String>,
        movie_ids: &[i64],
    ) -> Result<MovieList, DbErr> {
        let txn = self.conn.begin().await?;
        let now = chrono::Utc::now().to_rfc3339();

        let list = movie_lists::ActiveModel {
            user_id: Set(user_id),
            name: Set(name),
            description: Set(description),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_items(&txn, list.id, user_id, movie_ids).await?;

        let created = find_owned(&txn, list.id, user_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("movie list {}", list.id)))?;

        txn.commit().await?;
        Ok(created)
    }

    /// Returns `None` when the list does not exist for this user.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        changes: MovieListRowChanges,
    ) -> Result<Option<MovieList>, DbErr> {
        let txn = self.conn.begin().await?;

        let Some(existing) = MovieLists::find_by_id(id)
            .filter(movie_lists::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let mut active: movie_lists::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&txn).await?;

        if let Some(movie_ids) = changes.movie_ids {
            MovieListItems::delete_many()
                .filter(movie_list_items::Column::ListId.eq(id))
                .exec(&txn)
                .await?;
            insert_items(&txn, id, user_id, &movie_ids).await?;
        }

        let updated = find_owned(&txn, id, user_id).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes the list and its membership rows; favorites are untouched.
    pub async fn delete(&self, id: i32, user_id: i32) -> Result<u64, DbErr> {
        let result = MovieLists::delete_many()
            .filter(movie_lists::Column::Id.eq(id))
            .filter(movie_lists::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Adding a movie that is already in the list is a no-op, including when
    /// two identical requests race.
    pub async fn add_item(&self, id: i32, user_id: i32, movie_id: i64) -> Result<(), DbErr> {
        insert_items(&self.conn, id, user_id, &[movie_id]).await
    }

    pub async fn remove_item(&self, id: i32, user_id: i32, movie_id: i64) -> Result<u64, DbErr> {
        let result = MovieListItems::delete_many()
            .filter(movie_list_items::Column::ListId.eq(id))
            .filter(movie_list_items::Column::UserId.eq(user_id))
            .filter(movie_list_items::Column::MovieId.eq(movie_id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}

async fn find_owned<C>(conn: &C, id: i32, user_id: i32) -> Result<Option<MovieList>, DbErr>
where
    C: ConnectionTrait,
{
    let Some(list) = MovieLists::find_by_id(id)
        .filter(movie_lists::Column::UserId.eq(user_id))
        .one(conn)
        .await?
    else {
        return Ok(None);
    };

    let mut members = load_members(conn, user_id, &[id]).await?;
    let movies = members.remove(&id).unwrap_or_default();
    Ok(Some(MovieList::from_model(list, movies)))
}

/// Loads the favorites of each list in `list_ids`, keyed by list id.
async fn load_members<C>(
    conn: &C,
    user_id: i32,
    list_ids: &[i32],
) -> Result<HashMap<i32, Vec<Favorite>>, DbErr>
where
    C: ConnectionTrait,
{
    if list_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let items = MovieListItems::find()
        .filter(movie_list_items::Column::ListId.is_in(list_ids.iter().copied()))
        .order_by_asc(movie_list_items::Column::AddedAt)
        .order_by_asc(movie_list_items::Column::MovieId)
        .all(conn)
        .await?;

    let movie_ids: Vec<i64> = items.iter().map(|i| i.movie_id).collect();
    let favorites: HashMap<i64, Favorite> = if movie_ids.is_empty() {
        HashMap::new()
    } else {
        Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::MovieId.is_in(movie_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|f| (f.movie_id, Favorite::from(f)))
            .collect()
    };

    let mut members: HashMap<i32, Vec<Favorite>> = HashMap::new();
    for item in items {
        if let Some(favorite) = favorites.get(&item.movie_id) {
            members
                .entry(item.list_id)
                .or_default()
                .push(favorite.clone());
        }
    }

    Ok(members)
}

async fn insert_items<C>(conn: &C, list_id: i32, user_id: i32, movie_ids: &[i64]) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    if movie_ids.is_empty() {
        return Ok(());
    }

    let mut seen = std::collections::HashSet::new();
    let now = chrono::Utc::now().to_rfc3339();
    let rows: Vec<movie_list_items::ActiveModel> = movie_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .map(|movie_id| movie_list_items::ActiveModel {
            list_id: Set(list_id),
            movie_id: Set(*movie_id),
            user_id: Set(user_id),
            added_at: Set(now.clone()),
        })
        .collect();

    MovieListItems::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                movie_list_items::Column::ListId,
                movie_list_items::Column::MovieId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
