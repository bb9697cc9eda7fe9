//! Category domain model.

use serde::{Deserialize, Serialize};

use longbox_core::CategoryId;

/// A product category. Categories form a tree via `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name (unique).
    pub name: String,
    /// URL slug (unique).
    pub slug: String,
    /// Parent category, if any.
    pub parent_id: Option<CategoryId>,
}

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryInput {
    /// Display name.
    pub name: String,
    /// URL slug; derived from the name when absent.
    pub slug: Option<String>,
    /// Parent category.
    pub parent_id: Option<CategoryId>,
}
