//! Database operations for carts.
//!
//! A cart is an order in `pending` status. Resolution keys on the request
//! identity (user id XOR guest session key) and leans on the partial unique
//! indexes for the one-cart-per-identity invariant: concurrent creation for
//! the same identity converges on one row, with the loser recovering by
//! lookup instead of surfacing the constraint violation.
//!
//! Cart mutations never touch product stock. The cart is a wishlist, not a
//! reservation; stock is checked only at checkout, by the lifecycle engine.

use sqlx::PgPool;

use longbox_core::{CartIdentity, OrderId, OrderItemId, ProductId};
use rust_decimal::Decimal;

use super::OrderError;
use super::orders::{self, ORDER_COLUMNS, OrderRepository};
use crate::models::order::{CartSnapshot, Order};

/// Repository for cart resolution and item mutation.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the identity's cart.
    ///
    /// Returns `None` when there is no cart and `create_if_missing` is false
    /// ("empty cart", not an error). Otherwise returns the single pending
    /// order for the identity, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if a query fails.
    pub async fn resolve(
        &self,
        identity: &CartIdentity,
        create_if_missing: bool,
    ) -> Result<Option<Order>, OrderError> {
        if let Some(order) = self.find_pending(identity).await? {
            return Ok(Some(order));
        }
        if !create_if_missing {
            return Ok(None);
        }
        if let Some(order) = self.insert_pending(identity).await? {
            return Ok(Some(order));
        }
        // Lost the creation race to a concurrent request; the winner's row
        // is committed by now, so the lookup finds it.
        let order = self
            .find_pending(identity)
            .await?
            .ok_or(OrderError::NotFound)?;
        Ok(Some(order))
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// An existing line for the product is incremented; a new line snapshots
    /// `unit_price` from the current product price. The cart total is
    /// recomputed afterward. Stock is not checked here.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` when the quantity is below 1 or the
    /// product is unknown.
    pub async fn add_item(
        &self,
        cart: &Order,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), OrderError> {
        if quantity < 1 {
            return Err(OrderError::Validation(
                "Quantity must be at least 1.".to_string(),
            ));
        }

        let price = self.product_price(product_id).await?.ok_or_else(|| {
            OrderError::Validation(format!("Product with ID {product_id} does not exist."))
        })?;

        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (order_id, product_id)
             DO UPDATE SET quantity = order_items.quantity + EXCLUDED.quantity",
        )
        .bind(cart.id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .execute(self.pool)
        .await?;

        orders::recalc_total(self.pool, cart.id).await?;
        Ok(())
    }

    /// Remove an item from the cart.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` when the item doesn't belong to the
    /// cart.
    pub async fn remove_item(&self, cart: &Order, item_id: OrderItemId) -> Result<(), OrderError> {
        let result = sqlx::query("DELETE FROM order_items WHERE id = $2 AND order_id = $1")
            .bind(cart.id)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OrderError::NotFound);
        }

        orders::recalc_total(self.pool, cart.id).await?;
        Ok(())
    }

    /// Adjust a line's quantity by `delta` (±1 semantics).
    ///
    /// Decrementing to zero or below deletes the line; incrementing a missing
    /// line creates it at quantity 1 with the price snapshotted now.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` when incrementing an unknown product or
    /// decrementing a line the cart doesn't have.
    pub async fn adjust_quantity(
        &self,
        cart: &Order,
        product_id: ProductId,
        delta: i32,
    ) -> Result<(), OrderError> {
        if delta >= 0 {
            let price = self
                .product_price(product_id)
                .await?
                .ok_or(OrderError::NotFound)?;

            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (order_id, product_id)
                 DO UPDATE SET quantity = order_items.quantity + EXCLUDED.quantity",
            )
            .bind(cart.id)
            .bind(product_id)
            .bind(delta.max(1))
            .bind(price)
            .execute(self.pool)
            .await?;
        } else {
            let line: Option<(OrderItemId, i32)> = sqlx::query_as(
                "SELECT id, quantity FROM order_items WHERE order_id = $1 AND product_id = $2",
            )
            .bind(cart.id)
            .bind(product_id)
            .fetch_optional(self.pool)
            .await?;

            let (item_id, quantity) = line.ok_or(OrderError::NotFound)?;
            if quantity + delta <= 0 {
                sqlx::query("DELETE FROM order_items WHERE id = $1")
                    .bind(item_id)
                    .execute(self.pool)
                    .await?;
            } else {
                sqlx::query("UPDATE order_items SET quantity = quantity + $2 WHERE id = $1")
                    .bind(item_id)
                    .bind(delta)
                    .execute(self.pool)
                    .await?;
            }
        }

        orders::recalc_total(self.pool, cart.id).await?;
        Ok(())
    }

    /// Load the cart payload: the order with its items and fresh total.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order vanished.
    pub async fn snapshot(&self, cart_id: OrderId) -> Result<CartSnapshot, OrderError> {
        let repo = OrderRepository::new(self.pool);
        let order = repo.get(cart_id).await?.ok_or(OrderError::NotFound)?;
        let items = repo.item_details(cart_id).await?;
        Ok(CartSnapshot::new(&order, items))
    }

    async fn find_pending(&self, identity: &CartIdentity) -> Result<Option<Order>, OrderError> {
        let order = match identity {
            CartIdentity::User(user_id) => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders
                     WHERE status = 'pending' AND user_id = $1"
                ))
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?
            }
            CartIdentity::Guest(key) => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders
                     WHERE status = 'pending' AND session_key = $1"
                ))
                .bind(key)
                .fetch_optional(self.pool)
                .await?
            }
        };
        Ok(order)
    }

    /// Insert a pending order for the identity. Returns `None` when a
    /// concurrent request won the race (the partial unique index absorbed
    /// the insert).
    async fn insert_pending(&self, identity: &CartIdentity) -> Result<Option<Order>, OrderError> {
        let order = match identity {
            CartIdentity::User(user_id) => {
                sqlx::query_as::<_, Order>(&format!(
                    "INSERT INTO orders (user_id, status) VALUES ($1, 'pending')
                     ON CONFLICT (user_id) WHERE status = 'pending' DO NOTHING
                     RETURNING {ORDER_COLUMNS}"
                ))
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?
            }
            CartIdentity::Guest(key) => {
                sqlx::query_as::<_, Order>(&format!(
                    "INSERT INTO orders (session_key, status) VALUES ($1, 'pending')
                     ON CONFLICT (session_key) WHERE status = 'pending' DO NOTHING
                     RETURNING {ORDER_COLUMNS}"
                ))
                .bind(key)
                .fetch_optional(self.pool)
                .await?
            }
        };
        Ok(order)
    }

    async fn product_price(&self, product_id: ProductId) -> Result<Option<Decimal>, OrderError> {
        let price: Option<Decimal> =
            sqlx::query_scalar("SELECT price FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(self.pool)
                .await?;
        Ok(price)
    }
}
