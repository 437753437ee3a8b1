use serde::{Deserialize, Deserializer, Serialize};

use super::Favorite;
use crate::entities::movie_lists;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieList {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub movies: Vec<Favorite>,
    pub created_at: String,
    pub updated_at: String,
}

impl MovieList {
    #[must_use]
    pub fn from_model(model: movie_lists::Model, movies: Vec<Favorite>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            movies,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMovieList {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "movieIds")]
    pub movie_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieListChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the description, an absent field keeps it.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Replaces the whole membership when present.
    #[serde(rename = "movieIds")]
    pub movie_ids: Option<Vec<i64>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
