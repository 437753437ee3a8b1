use anyhow::Context;
use std::sync::Arc;

use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::security::{PasswordHasher, TokenIssuer};
use crate::services::{
    AuthService, CatalogProvider, FavoriteService, SeaOrmAuthService, SeaOrmFavoriteService,
    SeaOrmUserService, UserService,
};

/// Everything a request handler or CLI command needs, built once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub user_service: Arc<dyn UserService>,

    pub auth_service: Arc<dyn AuthService>,

    pub favorite_service: Arc<dyn FavoriteService>,

    pub catalog: Arc<dyn CatalogProvider>,
}

impl SharedState {
    /// Opens the store and wires the services against the TMDB catalog.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::connect(&config.general).await?;
        let catalog: Arc<dyn CatalogProvider> = Arc::new(
            TmdbClient::new(&config.catalog).context("Failed to build catalog client")?,
        );

        Self::with_parts(config, store, catalog)
    }

    /// Wires the services over an already opened store and catalog.
    pub fn with_parts(
        config: Config,
        store: Store,
        catalog: Arc<dyn CatalogProvider>,
    ) -> anyhow::Result<Self> {
        let hasher =
            PasswordHasher::new(&config.security).context("Failed to set up password hashing")?;
        let tokens = Arc::new(TokenIssuer::from_config(&config.security));

        let user_service: Arc<dyn UserService> = Arc::new(SeaOrmUserService::new(
            store.clone(),
            hasher.clone(),
            config.security.min_password_length,
        ));

        let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            user_service.clone(),
            hasher,
            tokens,
        ));

        let favorite_service: Arc<dyn FavoriteService> =
            Arc::new(SeaOrmFavoriteService::new(store.clone()));

        Ok(Self {
            config: Arc::new(config),
            store,
            user_service,
            auth_service,
            favorite_service,
            catalog,
        })
    }
}
