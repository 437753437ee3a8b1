use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::CatalogConfig;
use crate::services::{CatalogError, CatalogProvider};

/// TMDB v3 client. The API key travels as the `api_key` query parameter.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("marquee/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, CatalogError> {
        if self.api_key.is_empty() {
            return Err(CatalogError::NotConfigured);
        }

        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, CatalogError> {
        let url = self.build_url(path, params)?;
        debug!(path, "Catalog request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(path, status = status.as_u16(), "Catalog provider returned an error");
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CatalogError::Decode(e.without_url().to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    async fn search_movies(&self, query: &str, page: u32) -> Result<Value, CatalogError> {
        self.get(
            "/search/movie",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    async fn trending_movies(&self, page: u32) -> Result<Value, CatalogError> {
        self.get("/trending/movie/week", &[("page", page.to_string())])
            .await
    }

    async fn movie_details(&self, movie_id: i64) -> Result<Value, CatalogError> {
        self.get(&format!("/movie/{movie_id}"), &[]).await
    }

    async fn movie_credits(&self, movie_id: i64) -> Result<Value, CatalogError> {
        self.get(&format!("/movie/{movie_id}/credits"), &[]).await
    }

    async fn similar_movies(&self, movie_id: i64, page: u32) -> Result<Value, CatalogError> {
        self.get(
            &format!("/movie/{movie_id}/similar"),
            &[("page", page.to_string())],
        )
        .await
    }

    async fn movie_videos(&self, movie_id: i64) -> Result<Value, CatalogError> {
        self.get(&format!("/movie/{movie_id}/videos"), &[]).await
    }

    async fn watch_providers(&self, movie_id: i64) -> Result<Value, CatalogError> {
        self.get(&format!("/movie/{movie_id}/watch/providers"), &[])
            .await
    }

    async fn person_details(&self, person_id: i64) -> Result<Value, CatalogError> {
        self.get(&format!("/person/{person_id}"), &[]).await
    }

    async fn person_movie_credits(&self, person_id: i64) -> Result<Value, CatalogError> {
        self.get(&format!("/person/{person_id}/movie_credits"), &[])
            .await
    }
}
