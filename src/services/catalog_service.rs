//! Read-only access to the external movie catalog.
//!
//! Responses are passed through as opaque JSON; only the request side is
//! typed here.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog provider is not configured")]
    NotConfigured,

    #[error("Catalog request failed: {0}")]
    Request(String),

    #[error("Catalog provider responded with status {status}")]
    Upstream { status: u16 },

    #[error("Catalog response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn search_movies(&self, query: &str, page: u32) -> Result<Value, CatalogError>;

    async fn trending_movies(&self, page: u32) -> Result<Value, CatalogError>;

    async fn movie_details(&self, movie_id: i64) -> Result<Value, CatalogError>;

    async fn movie_credits(&self, movie_id: i64) -> Result<Value, CatalogError>;

    async fn similar_movies(&self, movie_id: i64, page: u32) -> Result<Value, CatalogError>;

    /// All videos attached to a movie; trailers are among them.
    async fn movie_videos(&self, movie_id: i64) -> Result<Value, CatalogError>;

    async fn watch_providers(&self, movie_id: i64) -> Result<Value, CatalogError>;

    async fn person_details(&self, person_id: i64) -> Result<Value, CatalogError>;

    async fn person_movie_credits(&self, person_id: i64) -> Result<Value, CatalogError>;
}
