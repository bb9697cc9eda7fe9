//! Database operations for users.
//!
//! Account creation and login are the auth service's concern; this
//! repository exists for role lookups, order ownership, and the CLI.

use sqlx::PgPool;

use longbox_core::UserId;

use super::RepositoryError;
use crate::models::user::{CreateUserInput, User};

const USER_COLUMNS: &str = "id, email, display_name, is_superuser, is_staff, groups, created_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM app_users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM app_users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(&self, input: &CreateUserInput) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO app_users (email, display_name, is_superuser, is_staff, groups)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&input.email)
        .bind(&input.display_name)
        .bind(input.is_superuser)
        .bind(input.is_staff)
        .bind(&input.groups)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(format!("email already registered: {}", input.email))
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(user)
    }
}
