//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check (in main)
//! GET  /health/ready                - Readiness check (in main)
//!
//! # Catalog
//! GET    /products                  - Product listing (filters/ordering)
//! POST   /products                  - Create product (staff)
//! GET    /products/{id}             - Product detail
//! PUT    /products/{id}             - Update product (staff)
//! DELETE /products/{id}             - Delete product (staff)
//! POST   /products/{id}/toggle_trending - Flip trending flag (staff)
//! GET    /categories                - Category listing
//! POST   /categories                - Create category (staff)
//! GET    /categories/{id}           - Category detail
//!
//! # Cart (identity comes from the session)
//! GET  /cart                        - Current cart contents
//! POST /cart/add_item               - Add or increment a line
//! POST /cart/remove_item            - Remove a line
//! POST /cart/increase_item          - Increment a line by one
//! POST /cart/decrease_item          - Decrement a line by one
//! POST /cart/checkout               - Pay the cart
//!
//! # Orders
//! GET  /orders                      - Order listing (own; staff sees all)
//! POST /orders                      - Direct purchase (no cart)
//! GET  /orders/{id}                 - Order detail
//! POST /orders/{id}/pay             - Mark paid (idempotent)
//! POST /orders/{id}/cancel          - Cancel, restoring stock
//! POST /orders/{id}/refund          - Refund, restoring stock
//! ```

use axum::Router;

use crate::state::AppState;

pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", products::routes())
        .nest("/categories", categories::routes())
        .nest("/cart", cart::routes())
        .nest("/orders", orders::routes())
}
