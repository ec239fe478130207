//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use sitehub_core::error::{AppError, ErrorKind};
use sitehub_core::result::AppResult;
use sitehub_entity::user::{NewUser, User};

/// Repository for user lookup and profile operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Create a new user.
    pub async fn create(&self, data: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.email)
        .bind(&data.name)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict(format!("Email '{}' is already registered", data.email))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    /// Update a user's profile fields.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = COALESCE($2, name), \
                              avatar_url = COALESCE($3, avatar_url), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(name)
        .bind(avatar_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?
        .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Mark a user's email address as verified.
    pub async fn mark_email_verified(&self, user_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET email_verified = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to mark email verified", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }
        Ok(())
    }
}
