//! User store port
//!
//! Persistence for user accounts sits behind a trait so the services above it
//! can be exercised against in-memory doubles.

use async_trait::async_trait;
use chrono::Utc;
use entity::users::{self, Entity as Users};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use std::sync::Arc;

use crate::error::{GatewayError, Result};

/// User persistence capability.
///
/// Emails are compared case-sensitively, matching the unique column in the
/// store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user record by email, if present.
    async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>>;

    /// Insert a new user.
    ///
    /// A unique-email violation surfaces as `UserAlreadyExists`; the store
    /// constraint is the backstop for concurrent signups racing the
    /// lookup-then-insert in the account service.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<users::Model>;
}

/// Sea-ORM backed user store.
pub struct SeaOrmUserStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserStore {
    /// Create a store over an established database connection.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SeaOrmUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(Into::into)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<users::Model> {
        let user = users::ActiveModel {
            email: Set(email.to_owned()),
            password_hash: Set(password_hash.to_owned()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        user.insert(&*self.db).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                GatewayError::UserAlreadyExists
            } else {
                err.into()
            }
        })
    }
}
