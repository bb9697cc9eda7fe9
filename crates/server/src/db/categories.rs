//! Database operations for categories.

use sqlx::PgPool;

use longbox_core::CategoryId;

use super::RepositoryError;
use crate::models::category::{Category, CreateCategoryInput};
use crate::models::product::slugify;

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a category. The slug is derived from the name when absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name or slug is taken,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(&self, input: &CreateCategoryInput) -> Result<Category, RepositoryError> {
        let slug = input
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&input.name));

        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug, parent_id)
             VALUES ($1, $2, $3)
             RETURNING id, name, slug, parent_id",
        )
        .bind(&input.name)
        .bind(&slug)
        .bind(input.parent_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(format!("category already exists: {}", input.name))
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(category)
    }

    /// Get a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, parent_id FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// List all categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, parent_id FROM categories ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }
}
