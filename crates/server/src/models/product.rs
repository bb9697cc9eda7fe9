//! Product domain model and catalog listing parameters.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use longbox_core::{CategoryId, ProductId};

/// A product in the catalog.
///
/// `is_active` is derived from `stock` and recomputed by every stock-writing
/// statement in the repositories; it is never set independently.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// URL slug (unique).
    pub slug: String,
    /// Long-form description.
    pub description: String,
    /// Category the product belongs to.
    pub category_id: CategoryId,
    /// Stock-keeping unit, if assigned.
    pub sku: Option<String>,
    /// Unit price. Serialized as a string ("19.99").
    pub price: Decimal,
    /// Units on hand.
    pub stock: i32,
    /// Units sold across paid orders.
    pub sales_count: i32,
    /// Derived: true iff stock > 0.
    pub is_active: bool,
    /// Featured on the storefront.
    pub trending: bool,
    /// Free-form metadata.
    pub attributes: Option<serde_json::Value>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    /// Display title.
    pub title: String,
    /// URL slug; derived from the title when absent.
    pub slug: Option<String>,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Category the product belongs to.
    pub category_id: CategoryId,
    /// Stock-keeping unit.
    pub sku: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Initial units on hand (negative values clamp to zero).
    #[serde(default)]
    pub stock: i32,
    /// Featured on the storefront.
    #[serde(default)]
    pub trending: bool,
    /// Free-form metadata.
    pub attributes: Option<serde_json::Value>,
}

/// Input for updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    /// Display title.
    pub title: Option<String>,
    /// URL slug.
    pub slug: Option<String>,
    /// Long-form description.
    pub description: Option<String>,
    /// Category the product belongs to.
    pub category_id: Option<CategoryId>,
    /// Stock-keeping unit.
    pub sku: Option<String>,
    /// Unit price.
    pub price: Option<Decimal>,
    /// Units on hand (negative values clamp to zero).
    pub stock: Option<i32>,
    /// Featured on the storefront.
    pub trending: Option<bool>,
    /// Free-form metadata.
    pub attributes: Option<serde_json::Value>,
}

/// Query parameters for listing products.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Filter by category.
    pub category: Option<CategoryId>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
    /// Filter by trending flag.
    pub trending: Option<bool>,
    /// Case-insensitive search over title and description.
    pub search: Option<String>,
    /// Sort key, optionally prefixed with `-` for descending
    /// (e.g. `-sales_count`).
    pub ordering: Option<String>,
    /// Page size (default 20, max 100).
    pub limit: Option<i64>,
    /// Offset into the result set.
    pub offset: Option<i64>,
}

/// Whitelisted product sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrdering {
    CreatedAt,
    Price,
    Stock,
    SalesCount,
}

impl ProductOrdering {
    /// Parse a raw ordering parameter into (key, descending).
    ///
    /// Unknown keys return `None`; callers fall back to the default order.
    #[must_use]
    pub fn parse(raw: &str) -> Option<(Self, bool)> {
        let (descending, key) = raw
            .strip_prefix('-')
            .map_or((false, raw), |rest| (true, rest));
        let ordering = match key {
            "created_at" => Self::CreatedAt,
            "price" => Self::Price,
            "stock" => Self::Stock,
            "sales_count" => Self::SalesCount,
            _ => return None,
        };
        Some((ordering, descending))
    }

    /// The column this key sorts by.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::SalesCount => "sales_count",
        }
    }
}

/// Derive a URL slug: lowercase, alphanumerics kept, runs of anything else
/// collapsed to single hyphens.
#[must_use]
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut last_was_hyphen = true; // suppress leading hyphen
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Saga Vol. 1"), "saga-vol-1");
        assert_eq!(slugify("  X-Men: Gold  "), "x-men-gold");
        assert_eq!(slugify("100 Bullets"), "100-bullets");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_ordering_parse() {
        assert_eq!(
            ProductOrdering::parse("sales_count"),
            Some((ProductOrdering::SalesCount, false))
        );
        assert_eq!(
            ProductOrdering::parse("-price"),
            Some((ProductOrdering::Price, true))
        );
        assert_eq!(
            ProductOrdering::parse("-created_at"),
            Some((ProductOrdering::CreatedAt, true))
        );
        // Unknown keys are rejected, not passed into SQL
        assert_eq!(ProductOrdering::parse("title; DROP TABLE products"), None);
    }

    #[test]
    fn test_price_serializes_as_string() {
        let price: Decimal = "19.99".parse().expect("decimal");
        let json = serde_json::to_string(&price).expect("serialize");
        assert_eq!(json, "\"19.99\"");
    }
}
