use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::Value;
use std::sync::Arc;

use super::validation::{validate_movie_id, validate_page, validate_person_id, validate_search_query};
use super::{ApiError, ApiResponse, AppState, PageQuery, SearchQuery};

type CatalogResult = Result<Json<ApiResponse<Value>>, ApiError>;

/// GET /catalog/search?query=&page=
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> CatalogResult {
    let query = validate_search_query(&params.query)?;
    let page = validate_page(params.page)?;

    let results = state.catalog().search_movies(query, page).await?;
    Ok(Json(ApiResponse::success(results)))
}

/// GET /catalog/trending?page=
pub async fn trending_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> CatalogResult {
    let page = validate_page(params.page)?;
    let results = state.catalog().trending_movies(page).await?;
    Ok(Json(ApiResponse::success(results)))
}

/// GET /catalog/movies/{id}
pub async fn movie_details(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> CatalogResult {
    let id = validate_movie_id(id)?;
    let movie = state.catalog().movie_details(id).await?;
    Ok(Json(ApiResponse::success(movie)))
}

/// GET /catalog/movies/{id}/credits
pub async fn movie_credits(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> CatalogResult {
    let id = validate_movie_id(id)?;
    let credits = state.catalog().movie_credits(id).await?;
    Ok(Json(ApiResponse::success(credits)))
}

/// GET /catalog/movies/{id}/similar?page=
pub async fn similar_movies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(params): Query<PageQuery>,
) -> CatalogResult {
    let id = validate_movie_id(id)?;
    let page = validate_page(params.page)?;
    let results = state.catalog().similar_movies(id, page).await?;
    Ok(Json(ApiResponse::success(results)))
}

/// GET /catalog/movies/{id}/trailers
pub async fn movie_trailers(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> CatalogResult {
    let id = validate_movie_id(id)?;
    let videos = state.catalog().movie_videos(id).await?;
    Ok(Json(ApiResponse::success(trailers_only(videos))))
}

/// GET /catalog/movies/{id}/providers
pub async fn watch_providers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> CatalogResult {
    let id = validate_movie_id(id)?;
    let providers = state.catalog().watch_providers(id).await?;
    Ok(Json(ApiResponse::success(providers)))
}

/// GET /catalog/people/{id}
pub async fn person_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> CatalogResult {
    let id = validate_person_id(id)?;
    let person = state.catalog().person_details(id).await?;
    Ok(Json(ApiResponse::success(person)))
}

/// GET /catalog/people/{id}/movies
pub async fn person_movies(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> CatalogResult {
    let id = validate_person_id(id)?;
    let credits = state.catalog().person_movie_credits(id).await?;
    Ok(Json(ApiResponse::success(credits)))
}

/// Keeps the entries of `results` whose `type` is "Trailer".
fn trailers_only(videos: Value) -> Value {
    let trailers: Vec<Value> = videos
        .get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter(|v| v.get("type").and_then(Value::as_str) == Some("Trailer"))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    Value::Array(trailers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trailers_are_filtered_from_videos() {
        let videos = json!({
            "id": 550,
            "results": [
                {"key": "a", "site": "YouTube", "type": "Trailer"},
                {"key": "b", "site": "YouTube", "type": "Featurette"},
                {"key": "c", "site": "Vimeo", "type": "Trailer"}
            ]
        });

        let trailers = trailers_only(videos);
        let keys: Vec<&str> = trailers
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v["key"].as_str())
            .collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn missing_results_yield_empty_list() {
        assert_eq!(trailers_only(json!({"id": 1})), json!([]));
    }
}
