//! Database operations for orders: the lifecycle engine.
//!
//! All stock and sales-counter mutation in the system happens here, inside
//! one transaction per operation. `pay` and the direct purchase path share
//! the same per-line routine (`deduct_stock`): write-lock the product row,
//! re-check stock, deduct, bump `sales_count`, recompute `is_active`. Cancel
//! and refund share `restore_stock`. The cart code never touches stock.
//!
//! Lock order is fixed (the order row first, then product rows in line-item
//! order), so two checkouts can contend only on products, and a stock check
//! can never pass on a row another checkout is mid-way through draining.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use longbox_core::{CartIdentity, OrderId, OrderItemId, OrderStatus, ProductId};

use super::OrderError;
use super::products::PRODUCT_COLUMNS;
use crate::models::order::{Order, OrderDetail, OrderItem, OrderItemDetail};
use crate::models::product::Product;

pub(crate) const ORDER_COLUMNS: &str =
    "id, user_id, session_key, status, total, shipping_address, created_at";

/// A line item to purchase directly (not via cart).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OrderLineInput {
    /// Product to purchase.
    pub product_id: ProductId,
    /// Units to purchase; must be at least 1.
    pub quantity: i32,
}

/// Input for the direct purchase path.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateOrderInput {
    /// Lines to purchase.
    pub items: Vec<OrderLineInput>,
    /// Opaque shipping address payload.
    pub shipping_address: Option<serde_json::Value>,
}

/// Product columns the payment routine needs under lock.
#[derive(Debug, sqlx::FromRow)]
struct LockedProduct {
    title: String,
    price: Decimal,
    stock: i32,
}

/// Flat row for an item joined with its product.
#[derive(sqlx::FromRow)]
struct ItemWithProductRow {
    item_id: OrderItemId,
    quantity: i32,
    unit_price: Decimal,
    #[sqlx(flatten)]
    product: Product,
}

/// Repository for order lifecycle operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// List orders, newest first. `None` lists everything (staff); an
    /// identity lists only its own orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_for(
        &self,
        identity: Option<&CartIdentity>,
    ) -> Result<Vec<Order>, OrderError> {
        let orders = match identity {
            None => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(self.pool)
                .await?
            }
            Some(CartIdentity::User(user_id)) => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(user_id)
                .fetch_all(self.pool)
                .await?
            }
            Some(CartIdentity::Guest(key)) => {
                sqlx::query_as::<_, Order>(&format!(
                    "SELECT {ORDER_COLUMNS} FROM orders WHERE session_key = $1
                     ORDER BY created_at DESC, id DESC"
                ))
                .bind(key)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(orders)
    }

    /// Load the items of an order with their products, in item order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn item_details(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<OrderItemDetail>, OrderError> {
        let rows = sqlx::query_as::<_, ItemWithProductRow>(&format!(
            "SELECT oi.id AS item_id, oi.quantity, oi.unit_price,
                    {}
             FROM order_items oi
             JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = $1
             ORDER BY oi.id",
            prefixed_product_columns()
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let item = OrderItem {
                    id: row.item_id,
                    order_id,
                    product_id: row.product.id,
                    quantity: row.quantity,
                    unit_price: row.unit_price,
                };
                OrderItemDetail::new(&item, row.product)
            })
            .collect())
    }

    /// Load the full detail payload for an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn detail(&self, id: OrderId) -> Result<OrderDetail, OrderError> {
        let order = self.get(id).await?.ok_or(OrderError::NotFound)?;
        let items = self.item_details(id).await?;
        Ok(OrderDetail::new(&order, items))
    }

    /// Recompute the order total from its items.
    ///
    /// Called after every cart mutation and after order creation.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn recalculate_total(&self, order_id: OrderId) -> Result<Decimal, OrderError> {
        Ok(recalc_total(self.pool, order_id).await?)
    }

    /// Store the shipping address on an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn set_shipping_address(
        &self,
        order_id: OrderId,
        address: &serde_json::Value,
    ) -> Result<(), OrderError> {
        sqlx::query("UPDATE orders SET shipping_address = $2 WHERE id = $1")
            .bind(order_id)
            .bind(address)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Mark an order as paid, deducting stock.
    ///
    /// Idempotent: paying a paid order changes nothing and succeeds. Any
    /// other non-pending status is also left untouched. On a pending order,
    /// every line is checked and deducted under a product row lock, in item
    /// order; the first shortage aborts the whole transaction.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist,
    /// `OrderError::InsufficientStock` if any line cannot be covered.
    pub async fn pay(&self, order_id: OrderId) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let mut order = lock_order(&mut tx, order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !order.status.is_payable() {
            // Already paid (retried request) or in a later state: no-op.
            tx.commit().await?;
            return Ok(order);
        }

        let items = load_items(&mut tx, order_id).await?;
        for item in &items {
            deduct_stock(&mut tx, item.product_id, item.quantity).await?;
        }

        set_status(&mut tx, order_id, OrderStatus::Paid).await?;
        tx.commit().await?;

        order.status = OrderStatus::Paid;
        Ok(order)
    }

    /// Cancel an order, restoring stock.
    ///
    /// Effective only from paid or shipped; anything else is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn cancel(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.release(order_id, OrderStatus::Cancelled).await
    }

    /// Refund an order, restoring stock.
    ///
    /// Effective only from paid; anything else is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist.
    pub async fn refund(&self, order_id: OrderId) -> Result<Order, OrderError> {
        self.release(order_id, OrderStatus::Refunded).await
    }

    /// Shared cancel/refund body: restore stock for every line and flip the
    /// status, or no-op when the transition isn't allowed.
    async fn release(&self, order_id: OrderId, to: OrderStatus) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await?;

        let mut order = lock_order(&mut tx, order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        let effective = match to {
            OrderStatus::Cancelled => order.status.can_cancel(),
            OrderStatus::Refunded => order.status.can_refund(),
            _ => false,
        };
        if !effective {
            tx.commit().await?;
            return Ok(order);
        }

        let items = load_items(&mut tx, order_id).await?;
        for item in &items {
            restore_stock(&mut tx, item.product_id, item.quantity).await?;
        }

        set_status(&mut tx, order_id, to).await?;
        tx.commit().await?;

        order.status = to;
        Ok(order)
    }

    /// Direct purchase: create and pay an order in one step, without a cart.
    ///
    /// Lines are pre-checked, then re-checked under product row locks inside
    /// the transaction that creates the order, creates its items, deducts
    /// stock, and computes the total. The order is born paid; a later `pay`
    /// call is the documented idempotent no-op. Any failure rolls the whole
    /// thing back: no order, no items, no stock changes.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` naming the offending product when a
    /// line is unknown or under-stocked at either check, or when a quantity
    /// is below 1.
    pub async fn create_direct(
        &self,
        identity: &CartIdentity,
        input: &CreateOrderInput,
    ) -> Result<OrderDetail, OrderError> {
        if input.items.is_empty() {
            return Err(OrderError::Validation(
                "Order must contain at least one item.".to_string(),
            ));
        }
        for line in &input.items {
            if line.quantity < 1 {
                return Err(OrderError::Validation(
                    "Quantity must be at least 1.".to_string(),
                ));
            }
        }

        // Pre-check outside the transaction: reject obviously bad requests
        // without taking any locks.
        for line in &input.items {
            let row: Option<(String, i32)> =
                sqlx::query_as("SELECT title, stock FROM products WHERE id = $1")
                    .bind(line.product_id)
                    .fetch_optional(self.pool)
                    .await?;
            match row {
                None => {
                    return Err(OrderError::Validation(format!(
                        "Product with ID {} does not exist.",
                        line.product_id
                    )));
                }
                Some((title, stock)) if stock < line.quantity => {
                    return Err(OrderError::Validation(format!(
                        "Not enough stock for {title}."
                    )));
                }
                Some(_) => {}
            }
        }

        let mut tx = self.pool.begin().await?;

        // Born paid: stock is deducted below, in this same transaction, by
        // the routine `pay` uses. Inserting as pending would also collide
        // with the identity's open cart on the partial unique index.
        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id, session_key, status, shipping_address)
             VALUES ($1, $2, 'paid', $3)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(identity.user_id())
        .bind(identity.session_key())
        .bind(&input.shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        for line in &input.items {
            let product = deduct_stock(&mut tx, line.product_id, line.quantity)
                .await
                .map_err(|e| match e {
                    // The locked re-check failing is a validation error on
                    // this path, with the serializer's trailing period.
                    OrderError::InsufficientStock(msg) => {
                        OrderError::Validation(format!("{msg}."))
                    }
                    other => other,
                })?;

            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (order_id, product_id)
                 DO UPDATE SET quantity = order_items.quantity + EXCLUDED.quantity",
            )
            .bind(order.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(product.price)
            .execute(&mut *tx)
            .await?;
        }

        recalc_total(&mut *tx, order.id).await?;
        tx.commit().await?;

        self.detail(order.id).await
    }
}

// =============================================================================
// Transaction-scoped helpers (shared with the cart resolver)
// =============================================================================

/// Product columns prefixed with the `p` join alias.
fn prefixed_product_columns() -> String {
    PRODUCT_COLUMNS
        .split(", ")
        .map(|col| format!("p.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lock an order row for the duration of the transaction.
async fn lock_order(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
    ))
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Load an order's items in item order.
async fn load_items(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, quantity, unit_price
         FROM order_items WHERE order_id = $1 ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await
}

/// Write-lock a product row and deduct stock for one line.
///
/// The lock closes the check-then-act race: two checkouts contending for the
/// last unit serialize here, and the second sees the already-deducted stock.
async fn deduct_stock(
    conn: &mut PgConnection,
    product_id: ProductId,
    quantity: i32,
) -> Result<LockedProduct, OrderError> {
    let product = sqlx::query_as::<_, LockedProduct>(
        "SELECT title, price, stock FROM products WHERE id = $1 FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| {
        OrderError::Validation(format!("Product with ID {product_id} does not exist."))
    })?;

    if product.stock < quantity {
        return Err(OrderError::InsufficientStock(format!(
            "Not enough stock for {}",
            product.title
        )));
    }

    sqlx::query(
        "UPDATE products
         SET stock = stock - $2,
             sales_count = sales_count + $2,
             is_active = (stock - $2) > 0,
             updated_at = now()
         WHERE id = $1",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    Ok(product)
}

/// Restore stock for one line (cancel/refund). `sales_count` floors at zero.
async fn restore_stock(
    conn: &mut PgConnection,
    product_id: ProductId,
    quantity: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE products
         SET stock = stock + $2,
             sales_count = GREATEST(sales_count - $2, 0),
             is_active = (stock + $2) > 0,
             updated_at = now()
         WHERE id = $1",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Flip an order's status.
async fn set_status(
    conn: &mut PgConnection,
    order_id: OrderId,
    status: OrderStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
        .bind(order_id)
        .bind(status)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Recompute an order's total from its items: Σ quantity × unit_price,
/// zero when empty.
pub(crate) async fn recalc_total<'e, E>(executor: E, order_id: OrderId) -> Result<Decimal, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar::<_, Decimal>(
        "UPDATE orders
         SET total = COALESCE(
             (SELECT SUM(quantity * unit_price) FROM order_items WHERE order_id = $1),
             0)
         WHERE id = $1
         RETURNING total",
    )
    .bind(order_id)
    .fetch_one(executor)
    .await
}
