use serde::{Deserialize, Serialize};

use crate::entities::favorites;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Favorite {
    pub movie_id: i64,
    pub user_id: i32,
    pub title: String,
    pub thumbnail: String,
    pub created_at: String,
}

impl From<favorites::Model> for Favorite {
    fn from(model: favorites::Model) -> Self {
        Self {
            movie_id: model.movie_id,
            user_id: model.user_id,
            title: model.title,
            thumbnail: model.thumbnail,
            created_at: model.created_at,
        }
    }
}

/// Request body for favoriting a movie; the owner comes from the token.
#[derive(Debug, Clone, Deserialize)]
pub struct NewFavorite {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
}
