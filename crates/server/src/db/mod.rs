//! Database operations for `PostgreSQL`.
//!
//! One repository per aggregate, using sqlx's runtime query API. All
//! stock-affecting statements recompute `is_active` in the same statement,
//! and everything the lifecycle engine does runs inside a single transaction.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p longbox-cli -- migrate
//! ```

pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use cart::CartRepository;
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email, referenced product).
    #[error("{0}")]
    Conflict(String),
}

/// Errors from cart and order lifecycle operations.
///
/// Validation failures and insufficient stock surface as 400s, missing
/// entities as 404s. The duplicate-pending-order race never appears here;
/// the cart resolver recovers from it internally.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A product cannot cover the requested quantity.
    #[error("{0}")]
    InsufficientStock(String),

    /// Client input is malformed (unknown product, quantity < 1, ...).
    #[error("{0}")]
    Validation(String),

    /// Order or item not found.
    #[error("not found")]
    NotFound,

    /// Underlying storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(err))
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
