//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{Store, UserRow, UserRowChanges, is_unique_violation};
use crate::models::{NewUser, User, UserChanges};
use crate::security::PasswordHasher;
use crate::services::user_service::{UserError, UserService};

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PASSWORD_LEN: usize = 1024;

pub struct SeaOrmUserService {
    store: Store,
    hasher: PasswordHasher,
    min_password_length: usize,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, hasher: PasswordHasher, min_password_length: usize) -> Self {
        Self {
            store,
            hasher,
            min_password_length,
        }
    }

    fn validate_password(&self, password: &str) -> Result<(), UserError> {
        let len = password.chars().count();
        if len < self.min_password_length {
            return Err(UserError::Validation(format!(
                "Password must be at least {} characters",
                self.min_password_length
            )));
        }
        if len > MAX_PASSWORD_LEN {
            return Err(UserError::Validation("Password is too long".to_string()));
        }
        Ok(())
    }
}

/// Trims and lowercases; emails compare case-insensitively.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<(), UserError> {
    let invalid = || UserError::Validation(format!("Invalid email address: {email}"));

    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}

fn validate_name(name: &str) -> Result<String, UserError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(UserError::Validation("Name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(UserError::Validation(format!(
            "Name must be {MAX_NAME_LEN} characters or less"
        )));
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn get_all(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.users().list().await?)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<User>, UserError> {
        Ok(self.store.users().get_by_id(id).await?)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.store.users().get_by_email(&normalize_email(email)).await?)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        let name = validate_name(&new_user.name)?;
        let email = normalize_email(&new_user.email);
        validate_email(&email)?;
        self.validate_password(&new_user.password)?;

        let password_hash = self.hasher.hash(&new_user.password).await?;

        let user = self
            .store
            .users()
            .insert(UserRow {
                name,
                email: email.clone(),
                password_hash,
                is_admin: new_user.is_admin,
            })
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    UserError::DuplicateEmail(email)
                } else {
                    e.into()
                }
            })?;

        info!(user_id = user.id, is_admin = user.is_admin, "User created");
        Ok(user)
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<User, UserError> {
        let name = changes.name.as_deref().map(validate_name).transpose()?;

        let email = changes.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            validate_email(email)?;
        }

        let password_hash = match changes.password.as_deref() {
            Some(password) => {
                self.validate_password(password)?;
                Some(self.hasher.hash(password).await?)
            }
            None => None,
        };
        let password_changed = password_hash.is_some();

        let updated = self
            .store
            .users()
            .update(
                id,
                UserRowChanges {
                    name,
                    email: email.clone(),
                    password_hash,
                    is_admin: changes.is_admin,
                },
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    UserError::DuplicateEmail(email.clone().unwrap_or_default())
                } else {
                    e.into()
                }
            })?
            .ok_or(UserError::NotFound(id))?;

        info!(user_id = id, password_changed, "User updated");
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), UserError> {
        let removed = self.store.users().delete(id).await?;
        if removed == 0 {
            return Err(UserError::NotFound(id));
        }

        info!(user_id = id, "User deleted");
        Ok(())
    }
}
