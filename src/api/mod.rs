use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, CatalogProvider, FavoriteService, UserService};
use crate::state::SharedState;

pub mod auth;
mod catalog;
mod error;
mod extract;
mod favorites;
mod lists;
mod observability;
mod system;
mod types;
mod users;
mod validation;

pub use auth::AuthUser;
pub use error::ApiError;
pub use extract::ApiJson;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn new(shared: Arc<SharedState>, prometheus_handle: Option<PrometheusHandle>) -> Arc<Self> {
        Arc::new(Self {
            shared,
            prometheus_handle,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn users(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }

    #[must_use]
    pub fn favorites(&self) -> &Arc<dyn FavoriteService> {
        &self.shared.favorite_service
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn CatalogProvider> {
        &self.shared.catalog
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/health", get(system::health))
        .with_state(state);

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/me", get(users::current_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route(
            "/favorites/{movie_id}",
            get(favorites::get_favorite).delete(favorites::remove_favorite),
        )
        .route("/lists", get(lists::list_lists).post(lists::create_list))
        .route(
            "/lists/{id}",
            get(lists::get_list)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route(
            "/lists/{id}/movies/{movie_id}",
            post(lists::add_list_movie).delete(lists::remove_list_movie),
        )
        .route("/catalog/search", get(catalog::search_movies))
        .route("/catalog/trending", get(catalog::trending_movies))
        .route("/catalog/movies/{id}", get(catalog::movie_details))
        .route("/catalog/movies/{id}/credits", get(catalog::movie_credits))
        .route("/catalog/movies/{id}/similar", get(catalog::similar_movies))
        .route("/catalog/movies/{id}/trailers", get(catalog::movie_trailers))
        .route("/catalog/movies/{id}/providers", get(catalog::watch_providers))
        .route("/catalog/people/{id}", get(catalog::person_details))
        .route("/catalog/people/{id}/movies", get(catalog::person_movies))
        .route("/metrics", get(system::metrics))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::auth_middleware,
        ))
}
