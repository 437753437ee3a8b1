//! Smoke tests for favorites, lists and catalog flows used by the frontend.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use marquee::config::Config;
use marquee::db::Store;
use marquee::services::{CatalogError, CatalogProvider};
use marquee::state::SharedState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

/// Canned catalog answering from memory.
struct FakeCatalog;

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn search_movies(&self, query: &str, page: u32) -> Result<Value, CatalogError> {
        Ok(json!({"page": page, "query": query, "results": [{"id": 603, "title": "The Matrix"}]}))
    }

    async fn trending_movies(&self, page: u32) -> Result<Value, CatalogError> {
        Ok(json!({"page": page, "results": []}))
    }

    async fn movie_details(&self, movie_id: i64) -> Result<Value, CatalogError> {
        if movie_id == 404 {
            return Err(CatalogError::Upstream { status: 404 });
        }
        Ok(json!({"id": movie_id, "title": "The Matrix"}))
    }

    async fn movie_credits(&self, movie_id: i64) -> Result<Value, CatalogError> {
        Ok(json!({"id": movie_id, "cast": [], "crew": []}))
    }

    async fn similar_movies(&self, movie_id: i64, page: u32) -> Result<Value, CatalogError> {
        Ok(json!({"id": movie_id, "page": page, "results": []}))
    }

    async fn movie_videos(&self, movie_id: i64) -> Result<Value, CatalogError> {
        Ok(json!({
            "id": movie_id,
            "results": [
                {"key": "trailer-1", "type": "Trailer"},
                {"key": "teaser-1", "type": "Teaser"}
            ]
        }))
    }

    async fn watch_providers(&self, _movie_id: i64) -> Result<Value, CatalogError> {
        Err(CatalogError::Upstream { status: 503 })
    }

    async fn person_details(&self, person_id: i64) -> Result<Value, CatalogError> {
        Ok(json!({"id": person_id, "name": "Keanu Reeves"}))
    }

    async fn person_movie_credits(&self, person_id: i64) -> Result<Value, CatalogError> {
        Ok(json!({"id": person_id, "cast": [{"id": 603}]}))
    }
}

async fn spawn_app() -> (Arc<SharedState>, Router) {
    let db_path =
        std::env::temp_dir().join(format!("marquee-smoke-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.security.jwt_secret = "smoke-test-secret-at-least-32-bytes-long".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let store = Store::connect(&config.general)
        .await
        .expect("failed to open store");
    let shared = Arc::new(
        SharedState::with_parts(config, store, Arc::new(FakeCatalog))
            .expect("failed to create shared state"),
    );

    let router = marquee::api::router(marquee::api::AppState::new(shared.clone(), None));
    (shared, router)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, email: &str) -> (i64, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/register")
        .header("Content-Type", "application/json")
        .body(Body::from(
            json!({"name": "Viewer", "email": email, "password": "secret1"}).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    (
        body["data"]["user"]["id"].as_i64().unwrap(),
        body["data"]["token"].as_str().unwrap().to_string(),
    )
}

async fn favorite(app: &Router, token: &str, movie_id: i64, title: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/api/favorites",
        token,
        Some(json!({"movie_id": movie_id, "title": title, "thumbnail": format!("/{movie_id}.jpg")})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn movie_ids(list: &Value) -> Vec<i64> {
    list["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["movie_id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_two_users_can_favorite_the_same_movie() {
    let (_, app) = spawn_app().await;
    let (_, a) = register(&app, "a@x.com").await;
    let (_, b) = register(&app, "b@x.com").await;

    favorite(&app, &a, 603, "The Matrix").await;
    favorite(&app, &b, 603, "The Matrix").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/favorites",
        &a,
        Some(json!({"movie_id": 603, "title": "The Matrix"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "DELETE", "/api/favorites/603", &a, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/api/favorites/603", &b, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "The Matrix");

    let (status, _) = send(&app, "GET", "/api/favorites/603", &a, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_validation() {
    let (_, app) = spawn_app().await;
    let (_, token) = register(&app, "a@x.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/favorites",
        &token,
        Some(json!({"movie_id": 0, "title": "Zero"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/favorites",
        &token,
        Some(json!({"movie_id": 5, "title": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", "/api/favorites/-1", &token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_list_lifecycle() {
    let (_, app) = spawn_app().await;
    let (_, token) = register(&app, "a@x.com").await;
    favorite(&app, &token, 603, "The Matrix").await;
    favorite(&app, &token, 604, "The Matrix Reloaded").await;
    favorite(&app, &token, 605, "The Matrix Revolutions").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/lists",
        &token,
        Some(json!({"name": "Trilogy", "description": "Red pill", "movieIds": [603, 604]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let list_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(movie_ids(&body["data"]), vec![603, 604]);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/lists/{list_id}/movies/605"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/lists/{list_id}/movies/605"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/lists/{list_id}"), &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(movie_ids(&body["data"]).len(), 3);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/lists/{list_id}"),
        &token,
        Some(json!({"name": "Favourites", "description": null, "movieIds": [605]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Favourites");
    assert!(body["data"]["description"].is_null());
    assert_eq!(movie_ids(&body["data"]), vec![605]);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/lists/{list_id}/movies/603"),
        &token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unfavoriting drops the movie from every list.
    let (status, _) = send(&app, "DELETE", "/api/favorites/605", &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = send(&app, "GET", &format!("/api/lists/{list_id}"), &token, None).await;
    assert!(movie_ids(&body["data"]).is_empty());

    let (status, _) = send(&app, "DELETE", &format!("/api/lists/{list_id}"), &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/api/lists/{list_id}"), &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/favorites", &token, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_lists_only_hold_owned_favorites() {
    let (_, app) = spawn_app().await;
    let (_, a) = register(&app, "a@x.com").await;
    let (_, b) = register(&app, "b@x.com").await;
    favorite(&app, &a, 603, "The Matrix").await;
    favorite(&app, &b, 680, "Pulp Fiction").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/lists",
        &a,
        Some(json!({"name": "Mixed", "movieIds": [603, 680]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "POST", "/api/lists", &a, Some(json!({"name": "Mine"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let list_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/lists/{list_id}/movies/680"),
        &a,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for (method, uri) in [
        ("GET", format!("/api/lists/{list_id}")),
        ("DELETE", format!("/api/lists/{list_id}")),
        ("POST", format!("/api/lists/{list_id}/movies/680")),
    ] {
        let (status, _) = send(&app, method, &uri, &b, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/lists/{list_id}"),
        &b,
        Some(json!({"name": "Stolen"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/lists", &b, None).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(&app, "POST", "/api/lists", &a, Some(json!({"name": " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_user_cascades() {
    let (shared, app) = spawn_app().await;
    let (id, token) = register(&app, "a@x.com").await;
    favorite(&app, &token, 603, "The Matrix").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/lists",
        &token,
        Some(json!({"name": "Keep", "movieIds": [603]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), &token, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let user_id = i32::try_from(id).unwrap();
    assert!(shared.favorite_service.get_by_user(user_id).await.unwrap().is_empty());
    assert!(shared.favorite_service.get_lists(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_catalog_proxy() {
    let (_, app) = spawn_app().await;
    let (_, token) = register(&app, "a@x.com").await;

    let (status, body) = send(&app, "GET", "/api/catalog/search?query=matrix&page=2", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["query"], "matrix");
    assert_eq!(body["data"]["page"], 2);

    let (status, _) = send(&app, "GET", "/api/catalog/search?query=%20", &token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/catalog/search", &token, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/catalog/movies/603", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 603);

    let (status, _) = send(&app, "GET", "/api/catalog/movies/404", &token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/catalog/movies/603/trailers", &token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([{"key": "trailer-1", "type": "Trailer"}]));

    let (status, body) = send(&app, "GET", "/api/catalog/movies/603/providers", &token, None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Catalog service is unavailable");

    for uri in [
        "/api/catalog/trending",
        "/api/catalog/movies/603/credits",
        "/api/catalog/movies/603/similar?page=1",
        "/api/catalog/people/6384",
        "/api/catalog/people/6384/movies",
    ] {
        let (status, _) = send(&app, "GET", uri, &token, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }

    let request = Request::builder()
        .uri("/api/catalog/trending")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
