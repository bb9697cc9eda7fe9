//! Shared fixtures for building model values in tests.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use longbox_core::{CategoryId, OrderId, OrderItemId, OrderStatus, ProductId};
use longbox_server::models::order::{Order, OrderItem, OrderItemDetail};
use longbox_server::models::product::Product;

/// A product with the given id, price, and stock.
#[must_use]
pub fn product(id: i32, price: &str, stock: i32) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Test Comic #{id}"),
        slug: format!("test-comic-{id}"),
        description: String::new(),
        category_id: CategoryId::new(1),
        sku: None,
        price: parse_decimal(price),
        stock,
        sales_count: 0,
        is_active: stock > 0,
        trending: false,
        attributes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// An order in the given status with the given total.
#[must_use]
pub fn order(id: i32, status: OrderStatus, total: &str) -> Order {
    Order {
        id: OrderId::new(id),
        user_id: None,
        session_key: Some(Uuid::new_v4().to_string()),
        status,
        total: parse_decimal(total),
        shipping_address: None,
        created_at: Utc::now(),
    }
}

/// An item detail for `quantity` units at `unit_price`.
#[must_use]
pub fn item_detail(item_id: i32, product_id: i32, quantity: i32, unit_price: &str) -> OrderItemDetail {
    let item = OrderItem {
        id: OrderItemId::new(item_id),
        order_id: OrderId::new(1),
        product_id: ProductId::new(product_id),
        quantity,
        unit_price: parse_decimal(unit_price),
    };
    OrderItemDetail::new(&item, product(product_id, unit_price, 10))
}

/// Parse a decimal literal.
///
/// # Panics
///
/// Panics when the literal is not a valid decimal (test bug).
#[must_use]
pub fn parse_decimal(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}
