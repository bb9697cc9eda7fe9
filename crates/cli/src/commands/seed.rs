//! Seed the catalog with demo data.
//!
//! Inserts a small comic-shop catalog for local development: three
//! categories and a handful of products with stock. Safe to run repeatedly;
//! rows that already exist (by name/slug) are skipped.

use rust_decimal::Decimal;
use tracing::{info, warn};

use longbox_server::db::{CategoryRepository, ProductRepository, RepositoryError};
use longbox_server::models::category::CreateCategoryInput;
use longbox_server::models::product::CreateProductInput;

use super::{CommandError, connect};

struct SeedProduct {
    title: &'static str,
    category: &'static str,
    price: &'static str,
    stock: i32,
}

const CATEGORIES: &[&str] = &["Graphic Novels", "Single Issues", "Manga"];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        title: "Saga Vol. 1",
        category: "Graphic Novels",
        price: "14.99",
        stock: 25,
    },
    SeedProduct {
        title: "Watchmen",
        category: "Graphic Novels",
        price: "24.99",
        stock: 12,
    },
    SeedProduct {
        title: "The Wicked + The Divine #1",
        category: "Single Issues",
        price: "3.99",
        stock: 40,
    },
    SeedProduct {
        title: "Monstress #1",
        category: "Single Issues",
        price: "4.99",
        stock: 0,
    },
    SeedProduct {
        title: "Akira Vol. 1",
        category: "Manga",
        price: "29.99",
        stock: 8,
    },
];

/// Seed demo categories and products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails for a
/// reason other than the row already existing.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    for name in CATEGORIES {
        let input = CreateCategoryInput {
            name: (*name).to_string(),
            slug: None,
            parent_id: None,
        };
        match categories.create(&input).await {
            Ok(category) => info!(name = %category.name, id = %category.id, "Created category"),
            Err(RepositoryError::Conflict(_)) => warn!(name, "Category exists, skipping"),
            Err(e) => return Err(e.into()),
        }
    }

    let existing = categories.list().await?;

    for seed in PRODUCTS {
        let Some(category) = existing.iter().find(|c| c.name == seed.category) else {
            warn!(category = seed.category, "Missing category, skipping");
            continue;
        };

        let price: Decimal = seed.price.parse().expect("seed prices are valid decimals");

        let input = CreateProductInput {
            title: seed.title.to_string(),
            slug: None,
            description: String::new(),
            category_id: category.id,
            sku: Some(format!("LBX-{:08}", rand::random::<u32>() % 100_000_000)),
            price,
            stock: seed.stock,
            trending: false,
            attributes: None,
        };
        match products.create(&input).await {
            Ok(product) => {
                info!(title = %product.title, id = %product.id, stock = product.stock, "Created product");
            }
            Err(RepositoryError::Conflict(_)) => warn!(title = seed.title, "Product exists, skipping"),
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seed complete!");
    Ok(())
}
