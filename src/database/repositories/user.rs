//! User repository implementation
//!
//! Every read goes through the active-user predicate: a row with a
//! non-null deleted_at is treated as absent.

use sqlx::PgPool;

use crate::models::user::{CreateUserData, User};
use crate::utils::errors::GatherlyError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, data: CreateUserData) -> Result<User, GatherlyError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email, created_at, updated_at, deleted_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find an active user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, GatherlyError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at, deleted_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check that every given ID references an active user
    pub async fn all_exist(&self, ids: &[i64]) -> Result<bool, GatherlyError> {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(&unique)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 == unique.len() as i64)
    }

    /// Soft-delete a user; the row stays for referential integrity
    pub async fn soft_delete(&self, id: i64) -> Result<(), GatherlyError> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(GatherlyError::UserNotFound { user_id: id });
        }

        Ok(())
    }
}
