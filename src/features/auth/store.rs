use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::auth::models::{NewUser, User};

/// Persistence seam for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Fails with `DuplicateEmail` when the email is already taken.
    async fn insert(&self, user: NewUser) -> Result<User>;
}

/// PostgreSQL-backed user store
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, enabled, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, enabled)
             VALUES ($1, $2, $3)
             RETURNING id, email, password_hash, enabled, created_at",
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Two concurrent registrations can pass the existence check; the
            // unique index decides the winner
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::DuplicateEmail;
                }
            }
            AppError::Database(e)
        })?;

        Ok(created)
    }
}
