//! Order domain model and API payloads.
//!
//! An order in `pending` status is a cart. `total` is derived from the items
//! and recomputed after every mutation; `unit_price` is snapshotted from the
//! product when a line is first created and never recomputed afterward.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use longbox_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::product::Product;

/// An order row. Owner is `user_id` XOR `session_key`; `user_id` may be null
/// on historical orders after account deletion.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user, when placed by an authenticated user.
    pub user_id: Option<UserId>,
    /// Owning guest session key, when placed anonymously.
    pub session_key: Option<String>,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Derived sum of item subtotals.
    pub total: Decimal,
    /// Opaque shipping address payload.
    pub shipping_address: Option<serde_json::Value>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

/// An order line item.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Units of the product. Always positive; a line at zero is deleted.
    pub quantity: i32,
    /// Price per unit at the time the line was created.
    pub unit_price: Decimal,
}

/// Subtotal for one line: unit price times quantity.
#[must_use]
pub fn line_subtotal(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Order total: sum of line subtotals, zero for an empty order.
#[must_use]
pub fn order_total(items: &[OrderItemDetail]) -> Decimal {
    items.iter().map(|item| item.subtotal).sum()
}

/// A line item with its product, as served in order and cart payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    /// Item ID.
    pub id: OrderItemId,
    /// The referenced product.
    pub product: Product,
    /// Units of the product.
    pub quantity: i32,
    /// Snapshotted price per unit.
    pub unit_price: Decimal,
    /// unit_price × quantity.
    pub subtotal: Decimal,
}

impl OrderItemDetail {
    /// Build the payload for an item and its product.
    #[must_use]
    pub fn new(item: &OrderItem, product: Product) -> Self {
        Self {
            id: item.id,
            product,
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: line_subtotal(item.unit_price, item.quantity),
        }
    }
}

/// Full order payload: `GET /orders/{id}`, checkout and direct purchase
/// responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Order ID.
    pub id: OrderId,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Derived total.
    pub total: Decimal,
    /// Opaque shipping address payload.
    pub shipping_address: Option<serde_json::Value>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// Line items with their products.
    pub items: Vec<OrderItemDetail>,
}

impl OrderDetail {
    /// Build the payload for an order and its loaded items.
    #[must_use]
    pub fn new(order: &Order, items: Vec<OrderItemDetail>) -> Self {
        Self {
            id: order.id,
            status: order.status,
            total: order.total,
            shipping_address: order.shipping_address.clone(),
            created_at: order.created_at,
            items,
        }
    }
}

/// Cart payload: every cart endpoint returns this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Order ID of the cart.
    pub id: OrderId,
    /// Line items with their products.
    pub items: Vec<OrderItemDetail>,
    /// Derived total.
    pub total: Decimal,
    /// Always `pending` for a live cart.
    pub status: OrderStatus,
}

impl CartSnapshot {
    /// Build the payload for a cart and its loaded items.
    #[must_use]
    pub fn new(order: &Order, items: Vec<OrderItemDetail>) -> Self {
        Self {
            id: order.id,
            items,
            total: order.total,
            status: order.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use longbox_core::CategoryId;

    fn product(id: i32, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Issue #{id}"),
            slug: format!("issue-{id}"),
            description: String::new(),
            category_id: CategoryId::new(1),
            sku: None,
            price: price.parse().expect("decimal"),
            stock: 10,
            sales_count: 0,
            is_active: true,
            trending: false,
            attributes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item_detail(item_id: i32, product_id: i32, quantity: i32, unit_price: &str) -> OrderItemDetail {
        let item = OrderItem {
            id: OrderItemId::new(item_id),
            order_id: OrderId::new(1),
            product_id: ProductId::new(product_id),
            quantity,
            unit_price: unit_price.parse().expect("decimal"),
        };
        OrderItemDetail::new(&item, product(product_id, unit_price))
    }

    #[test]
    fn test_line_subtotal() {
        let subtotal = line_subtotal("4.99".parse().expect("decimal"), 3);
        assert_eq!(subtotal, "14.97".parse::<Decimal>().expect("decimal"));
    }

    #[test]
    fn test_order_total_sums_subtotals() {
        let items = vec![
            item_detail(1, 1, 2, "4.99"),
            item_detail(2, 2, 1, "12.50"),
        ];
        assert_eq!(
            order_total(&items),
            "22.48".parse::<Decimal>().expect("decimal")
        );
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_uses_snapshotted_price() {
        // The product's current price is irrelevant once the line exists
        let item = OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: ProductId::new(1),
            quantity: 2,
            unit_price: "3.00".parse().expect("decimal"),
        };
        let detail = OrderItemDetail::new(&item, product(1, "99.99"));
        assert_eq!(detail.subtotal, "6.00".parse::<Decimal>().expect("decimal"));
    }

    #[test]
    fn test_cart_snapshot_shape() {
        let order = Order {
            id: OrderId::new(7),
            user_id: None,
            session_key: Some("abc".to_string()),
            status: OrderStatus::Pending,
            total: "9.98".parse().expect("decimal"),
            shipping_address: None,
            created_at: Utc::now(),
        };
        let snapshot = CartSnapshot::new(&order, vec![item_detail(1, 1, 2, "4.99")]);
        let json = serde_json::to_value(&snapshot).expect("serialize");

        assert_eq!(json["id"], 7);
        assert_eq!(json["status"], "pending");
        assert_eq!(json["total"], "9.98");
        let item = &json["items"][0];
        assert_eq!(item["quantity"], 2);
        assert_eq!(item["unit_price"], "4.99");
        assert_eq!(item["subtotal"], "9.98");
        assert_eq!(item["product"]["slug"], "issue-1");
        // The owner is not exposed in the snapshot
        assert!(json.get("session_key").is_none());
    }
}
