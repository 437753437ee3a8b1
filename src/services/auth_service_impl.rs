//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::Store;
use crate::models::{NewUser, User};
use crate::security::{PasswordHasher, TokenIssuer};
use crate::services::auth_service::{AuthError, AuthService, AuthSession};
use crate::services::user_service::UserService;
use crate::services::user_service_impl::normalize_email;

pub struct SeaOrmAuthService {
    store: Store,
    users: Arc<dyn UserService>,
    hasher: PasswordHasher,
    issuer: Arc<TokenIssuer>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        users: Arc<dyn UserService>,
        hasher: PasswordHasher,
        issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            store,
            users,
            hasher,
            issuer,
        }
    }

    fn session_for(&self, user: User) -> Result<AuthSession, AuthError> {
        let token = self.issuer.issue(&user.email)?;
        Ok(AuthSession { user, token })
    }
}

fn record_login(outcome: &'static str) {
    metrics::counter!("auth_login_attempts_total", "outcome" => outcome).increment(1);
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthSession>, AuthError> {
        let email = normalize_email(email);

        let Some((user, password_hash)) = self
            .store
            .users()
            .get_credentials_by_email(&email)
            .await?
        else {
            self.hasher.verify_dummy(password).await;
            record_login("failure");
            return Ok(None);
        };

        let matches = match self.hasher.verify(&password_hash, password).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                false
            }
        };

        if !matches {
            record_login("failure");
            return Ok(None);
        }

        record_login("success");
        info!(user_id = user.id, "User logged in");
        self.session_for(user).map(Some)
    }

    async fn register(&self, new_user: NewUser) -> Result<AuthSession, AuthError> {
        let user = self
            .users
            .create(NewUser {
                is_admin: false,
                ..new_user
            })
            .await?;

        info!(user_id = user.id, "User registered");
        self.session_for(user)
    }

    async fn resolve_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        let claims = self.issuer.verify(token)?;
        Ok(self.users.get_by_email(&claims.email).await?)
    }
}
