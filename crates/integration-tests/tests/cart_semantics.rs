//! Integration tests for cart identity, totals, and payload contracts.

use longbox_core::{
    CartIdentity, OrderId, OrderItemId, OrderStatus, ProductId, Role, UserId,
};
use longbox_integration_tests::fixtures::{item_detail, order, parse_decimal, product};
use longbox_server::models::order::{
    CartSnapshot, OrderDetail, OrderItem, OrderItemDetail, order_total,
};

// =============================================================================
// Totals
// =============================================================================

/// Empty cart, then two units of one product: total is twice the unit price.
#[test]
fn test_total_after_adding_two_units() {
    let empty: Vec<OrderItemDetail> = Vec::new();
    assert_eq!(order_total(&empty), parse_decimal("0"));

    let items = vec![item_detail(1, 1, 2, "14.99")];
    assert_eq!(order_total(&items), parse_decimal("29.98"));
}

/// Total is always the sum of unit_price × quantity over current items.
#[test]
fn test_total_invariant_over_mixed_items() {
    let items = vec![
        item_detail(1, 1, 3, "3.99"),
        item_detail(2, 2, 1, "24.99"),
        item_detail(3, 3, 2, "4.99"),
    ];
    let expected = parse_decimal("3.99") * parse_decimal("3")
        + parse_decimal("24.99")
        + parse_decimal("4.99") * parse_decimal("2");
    assert_eq!(order_total(&items), expected);
    assert_eq!(order_total(&items), parse_decimal("46.94"));
}

/// unit_price is a snapshot: the product's current price never leaks into an
/// existing line's subtotal.
#[test]
fn test_snapshotted_price_survives_product_repricing() {
    let line = OrderItem {
        id: OrderItemId::new(1),
        order_id: OrderId::new(1),
        product_id: ProductId::new(1),
        quantity: 2,
        unit_price: parse_decimal("3.99"),
    };
    // Product has since been repriced
    let repriced = product(1, "9.99", 10);
    let detail = OrderItemDetail::new(&line, repriced);

    assert_eq!(detail.unit_price, parse_decimal("3.99"));
    assert_eq!(detail.subtotal, parse_decimal("7.98"));
}

// =============================================================================
// Identity
// =============================================================================

/// A guest session cart and a user cart are distinct identities;
/// authenticating mid-session does not merge them.
#[test]
fn test_guest_and_user_identities_are_distinct() {
    let guest = CartIdentity::Guest("3f2a77ab-session".to_string());
    let user = CartIdentity::User(UserId::new(42));

    assert_ne!(guest, user);
    assert_eq!(guest.user_id(), None);
    assert_eq!(user.session_key(), None);

    // The same session key always resolves to the same identity
    assert_eq!(guest, CartIdentity::Guest("3f2a77ab-session".to_string()));
}

#[test]
fn test_role_hierarchy() {
    // Superadmin > Owner > Staff > Customer
    assert!(Role::Superadmin > Role::Owner);
    assert!(Role::Owner > Role::Staff);
    assert!(Role::Staff > Role::Customer);

    let owner_groups = vec!["Owner".to_string()];
    assert_eq!(Role::derive(false, false, &owner_groups), Role::Owner);
    assert_eq!(Role::derive(true, false, &owner_groups), Role::Superadmin);
}

// =============================================================================
// Payload contracts
// =============================================================================

/// Cart snapshot: `{id, items[], total, status}` with decimals as strings.
#[test]
fn test_cart_snapshot_contract() {
    let cart = order(7, OrderStatus::Pending, "29.98");
    let snapshot = CartSnapshot::new(&cart, vec![item_detail(1, 3, 2, "14.99")]);
    let json = serde_json::to_value(&snapshot).expect("serialize");

    assert_eq!(json["id"], 7);
    assert_eq!(json["status"], "pending");
    assert_eq!(json["total"], "29.98");

    let item = &json["items"][0];
    assert_eq!(item["id"], 1);
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["unit_price"], "14.99");
    assert_eq!(item["subtotal"], "29.98");
    assert_eq!(item["product"]["id"], 3);
    assert_eq!(item["product"]["price"], "14.99");
    assert_eq!(item["product"]["is_active"], true);
}

/// Order detail: `{id, status, total, shipping_address, created_at, items}`.
#[test]
fn test_order_detail_contract() {
    let mut paid = order(11, OrderStatus::Paid, "24.99");
    paid.shipping_address = Some(serde_json::json!({
        "line1": "12 Long Box Lane",
        "city": "Portland",
    }));

    let detail = OrderDetail::new(&paid, vec![item_detail(4, 9, 1, "24.99")]);
    let json = serde_json::to_value(&detail).expect("serialize");

    assert_eq!(json["id"], 11);
    assert_eq!(json["status"], "paid");
    assert_eq!(json["total"], "24.99");
    assert_eq!(json["shipping_address"]["city"], "Portland");
    assert!(json["created_at"].is_string());
    assert_eq!(json["items"].as_array().map(Vec::len), Some(1));

    // The owner columns are internal and never serialized here
    assert!(json.get("user_id").is_none());
    assert!(json.get("session_key").is_none());
}

/// `is_active` mirrors stock in the product payload.
#[test]
fn test_product_active_mirrors_stock() {
    assert!(product(1, "4.99", 3).is_active);
    assert!(!product(2, "4.99", 0).is_active);
}
