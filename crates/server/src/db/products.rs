//! Database operations for products (the catalog store).
//!
//! Invariant: `is_active` mirrors `stock > 0`. Every statement here that
//! writes `stock` also writes `is_active` from the same expression and clamps
//! incoming stock at zero; there is no separate "recompute" step to forget.
//! The lifecycle engine's stock mutations (in `db::orders`) follow the same
//! rule.

use sqlx::PgPool;

use longbox_core::ProductId;

use super::RepositoryError;
use crate::models::product::{
    CreateProductInput, Product, ProductFilter, ProductOrdering, UpdateProductInput, slugify,
};

pub(crate) const PRODUCT_COLUMNS: &str = "id, title, slug, description, category_id, sku, price, \
     stock, sales_count, is_active, trending, attributes, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a product. The slug is derived from the title when absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let slug = input
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&input.title));

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products
                 (title, slug, description, category_id, sku, price, stock, is_active,
                  trending, attributes)
             VALUES ($1, $2, $3, $4, $5, $6, GREATEST($7, 0), GREATEST($7, 0) > 0, $8, $9)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&slug)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(&input.sku)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.trending)
        .bind(&input.attributes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                RepositoryError::Conflict(format!("product slug already exists: {slug}"))
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List products with filtering, ordering, and pagination.
    ///
    /// Unknown ordering keys fall back to newest-first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let limit = filter.limit.unwrap_or(20).clamp(1, 100);
        let offset = filter.offset.unwrap_or(0).max(0);
        let (column, descending) = filter
            .ordering
            .as_deref()
            .and_then(ProductOrdering::parse)
            .map_or(("created_at", true), |(ordering, desc)| {
                (ordering.column(), desc)
            });
        let direction = if descending { "DESC" } else { "ASC" };

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE ($1::int IS NULL OR category_id = $1)
               AND ($2::bool IS NULL OR is_active = $2)
               AND ($3::bool IS NULL OR trending = $3)
               AND ($4::text IS NULL
                    OR title ILIKE '%' || $4 || '%'
                    OR description ILIKE '%' || $4 || '%')
             ORDER BY {column} {direction}, id
             LIMIT $5 OFFSET $6"
        ))
        .bind(filter.category)
        .bind(filter.is_active)
        .bind(filter.trending)
        .bind(&filter.search)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Update a product. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                 title = COALESCE($2, title),
                 slug = COALESCE($3, slug),
                 description = COALESCE($4, description),
                 category_id = COALESCE($5, category_id),
                 sku = COALESCE($6, sku),
                 price = COALESCE($7, price),
                 stock = GREATEST(COALESCE($8, stock), 0),
                 is_active = GREATEST(COALESCE($8, stock), 0) > 0,
                 trending = COALESCE($9, trending),
                 attributes = COALESCE($10, attributes),
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.category_id)
        .bind(&input.sku)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.trending)
        .bind(&input.attributes)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if order items reference the
    /// product, `RepositoryError::Database` for other failures.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    RepositoryError::Conflict(
                        "product is referenced by existing orders".to_string(),
                    )
                }
                other => RepositoryError::Database(other),
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip the trending flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn toggle_trending(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET trending = NOT trending, updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(product)
    }
}
