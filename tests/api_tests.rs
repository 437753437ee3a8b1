//! Auth gate, account and authorization behaviour over the HTTP surface.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use marquee::config::Config;
use marquee::models::NewUser;
use marquee::security::TokenIssuer;
use marquee::state::SharedState;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

fn test_config() -> Config {
    let db_path =
        std::env::temp_dir().join(format!("marquee-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.security.jwt_secret = TEST_SECRET.to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

async fn spawn_app() -> (Arc<SharedState>, Router) {
    let shared = Arc::new(
        SharedState::new(test_config())
            .await
            .expect("failed to create shared state"),
    );
    let router = marquee::api::router(marquee::api::AppState::new(shared.clone(), None));
    (shared, router)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

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

async fn register(app: &Router, name: &str, email: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({"name": name, "email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    (
        body["data"]["user"]["id"].as_i64().unwrap(),
        body["data"]["token"].as_str().unwrap().to_string(),
    )
}

async fn create_admin(shared: &SharedState, app: &Router) -> (i64, String) {
    shared
        .user_service
        .create(NewUser {
            name: "Root".to_string(),
            email: "root@x.com".to_string(),
            password: "rootpass".to_string(),
            is_admin: true,
        })
        .await
        .unwrap();

    let (status, body) = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({"email": "root@x.com", "password": "rootpass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    (
        body["data"]["user"]["id"].as_i64().unwrap(),
        body["data"]["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_register_login_and_favorites_scenario() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({"name": "A", "email": "a@x.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["email"], "a@x.com");
    assert_eq!(body["data"]["user"]["isAdmin"], false);
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("password_hash").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    let (status, body) = send(&app, "GET", "/api/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&token),
        Some(json!({"movie_id": 42, "title": "The Answer", "thumbnail": "/42.jpg"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["movie_id"], 42);

    let (status, _) = send(&app, "DELETE", "/api/favorites/42", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", "/api/favorites/42", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_gate() {
    let (shared, app) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/favorites", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Access Token Required");

    let request = Request::builder()
        .uri("/api/favorites")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, "GET", "/api/favorites", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid Access Token");

    let (_, token) = register(&app, "A", "a@x.com").await;
    let pos = token.find('.').unwrap() + 3;
    let mut tampered: Vec<char> = token.chars().collect();
    tampered[pos] = if tampered[pos] == 'x' { 'y' } else { 'x' };
    let tampered: String = tampered.into_iter().collect();
    let (status, _) = send(&app, "GET", "/api/favorites", Some(&tampered), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let issuer = TokenIssuer::from_config(&shared.config.security);
    let expired = issuer
        .issue_at("a@x.com", chrono::Utc::now() - chrono::Duration::hours(25))
        .unwrap();
    let (status, _) = send(&app, "GET", "/api/favorites", Some(&expired), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let other_secret = TokenIssuer::new(
        b"another-secret-that-is-32-bytes-long!!",
        chrono::Duration::hours(24),
    )
    .issue("a@x.com")
    .unwrap();
    let (status, _) = send(&app, "GET", "/api/favorites", Some(&other_secret), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_rejected() {
    let (_, app) = spawn_app().await;
    let (id, token) = register(&app, "A", "a@x.com").await;

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/api/favorites", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid Access Token");
}

#[tokio::test]
async fn test_public_routes() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert!(body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let (_, app) = spawn_app().await;
    register(&app, "A", "a@x.com").await;

    let (unknown_status, unknown_body) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"email": "nobody@x.com", "password": "secret1"})),
    )
    .await;
    let (wrong_status, wrong_body) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"email": "a@x.com", "password": "wrong-password"})),
    )
    .await;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_body, wrong_body);
    assert_eq!(wrong_body["error"], "Invalid credentials");

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"email": "A@X.COM ", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let (_, app) = spawn_app().await;
    register(&app, "A", "a@x.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({"name": "A2", "email": "A@x.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    for body in [
        json!({"name": "", "email": "b@x.com", "password": "secret1"}),
        json!({"name": "B", "email": "not-an-email", "password": "secret1"}),
        json!({"name": "B", "email": "b@x.com", "password": "123"}),
    ] {
        let (status, _) = send(&app, "POST", "/api/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_incomplete_bodies_use_the_error_envelope() {
    let (_, app) = spawn_app().await;
    let (_, token) = register(&app, "A", "a@x.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({"name": "A", "email": "b@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("password"));

    let (status, body) = send(
        &app,
        "POST",
        "/api/favorites",
        Some(&token),
        Some(json!({"movie_id": "not-a-number", "title": "Heat"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_register_ignores_admin_flag() {
    let (_, app) = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({"name": "M", "email": "m@x.com", "password": "secret1", "isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["isAdmin"], false);
}

#[tokio::test]
async fn test_user_authorization() {
    let (shared, app) = spawn_app().await;
    let (a_id, a_token) = register(&app, "A", "a@x.com").await;
    let (b_id, b_token) = register(&app, "B", "b@x.com").await;
    let (_, admin_token) = create_admin(&shared, &app).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{a_id}"),
        Some(&b_token),
        Some(json!({"name": "Hijacked"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{a_id}"), Some(&b_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{b_id}"),
        Some(&b_token),
        Some(json!({"name": "Bee"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Bee");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{b_id}"),
        Some(&b_token),
        Some(json!({"isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/users", Some(&a_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/api/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{a_id}"),
        Some(&admin_token),
        Some(json!({"isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isAdmin"], true);

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{b_id}"), Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/users/{b_id}"), Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let (_, app) = spawn_app().await;
    let (id, token) = register(&app, "A", "a@x.com").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{id}"),
        Some(&token),
        Some(json!({"password": "new-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"email": "a@x.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"email": "a@x.com", "password": "new-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // No revocation: the old token is still good until it expires.
    let (status, _) = send(&app, "GET", "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_email_change_conflict() {
    let (_, app) = spawn_app().await;
    register(&app, "A", "a@x.com").await;
    let (b_id, b_token) = register(&app, "B", "b@x.com").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{b_id}"),
        Some(&b_token),
        Some(json!({"email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_current_user_and_admin_create() {
    let (shared, app) = spawn_app().await;
    let (a_id, a_token) = register(&app, "A", "a@x.com").await;
    let (_, admin_token) = create_admin(&shared, &app).await;

    let (status, body) = send(&app, "GET", "/api/users/me", Some(&a_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], a_id);

    let new_user = json!({"name": "C", "email": "c@x.com", "password": "secret1", "isAdmin": true});

    let (status, _) = send(&app, "POST", "/api/users", Some(&a_token), Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "POST", "/api/users", Some(&admin_token), Some(new_user)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["isAdmin"], true);
}

#[tokio::test]
async fn test_metrics_is_admin_only() {
    let (shared, app) = spawn_app().await;
    let (_, a_token) = register(&app, "A", "a@x.com").await;
    let (_, admin_token) = create_admin(&shared, &app).await;

    let (status, _) = send(&app, "GET", "/api/metrics", Some(&a_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The recorder is not installed in tests.
    let (status, _) = send(&app, "GET", "/api/metrics", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
