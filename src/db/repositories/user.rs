use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{prelude::*, users};
use crate::models::User;

/// Row-level fields for an insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Column changes for an update. The password, if any, is already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserRowChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<User>, DbErr> {
        let users = Users::find()
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>, DbErr> {
        let user = Users::find_by_id(id).one(&self.conn).await?;
        Ok(user.map(User::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbErr> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?;

        Ok(user.map(User::from))
    }

    /// Get user by email together with the stored password hash (for login)
    pub async fn get_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, DbErr> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?;

        Ok(user.map(|u| {
            let password_hash = u.password_hash.clone();
            (User::from(u), password_hash)
        }))
    }

    /// Inserts a user. A taken email surfaces as the store's unique violation.
    pub async fn insert(&self, row: UserRow) -> Result<User, DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = users::ActiveModel {
            name: Set(row.name),
            email: Set(row.email),
            password_hash: Set(row.password_hash),
            is_admin: Set(row.is_admin),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(User::from(model))
    }

    /// Applies `changes` and returns the post-update record, or `None` if the
    /// user does not exist.
    pub async fn update(&self, id: i32, changes: UserRowChanges) -> Result<Option<User>, DbErr> {
        let Some(existing) = Users::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        if let Some(is_admin) = changes.is_admin {
            active.is_admin = Set(is_admin);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active.update(&self.conn).await?;
        Ok(Some(User::from(model)))
    }

    /// Deletes the user; favorites, lists and list items go with it through
    /// the cascading foreign keys. Returns the number of rows removed.
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = Users::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
