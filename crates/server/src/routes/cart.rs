//! Cart route handlers.
//!
//! Every mutation returns the fresh cart snapshot so clients never need a
//! follow-up read. The cart is resolved from the session identity on every
//! request; the first mutating call creates it.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use longbox_core::{CartIdentity, OrderItemId, ProductId};

use crate::db::{CartRepository, OrderError, OrderRepository};
use crate::error::AppError;
use crate::middleware::Identity;
use crate::models::order::{CartSnapshot, Order};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(show))
        .route("/add_item", post(add_item))
        .route("/remove_item", post(remove_item))
        .route("/increase_item", post(increase_item))
        .route("/decrease_item", post(decrease_item))
        .route("/checkout", post(checkout))
}

/// Add to cart payload.
#[derive(Debug, Deserialize)]
pub struct AddItemPayload {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Remove from cart payload.
#[derive(Debug, Deserialize)]
pub struct RemoveItemPayload {
    pub item_id: OrderItemId,
}

/// Increase/decrease payload.
#[derive(Debug, Deserialize)]
pub struct ProductRefPayload {
    pub product_id: ProductId,
}

/// Checkout payload. The whole body is optional.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutPayload {
    pub shipping_address: Option<serde_json::Value>,
}

/// Resolve the identity's cart, creating it if missing.
async fn require_cart(state: &AppState, identity: &CartIdentity) -> Result<Order, AppError> {
    CartRepository::new(state.pool())
        .resolve(identity, true)
        .await?
        .ok_or_else(|| AppError::Internal("cart resolution returned nothing".to_string()))
}

/// View current cart contents.
#[instrument(skip(state, identity))]
pub async fn show(
    State(state): State<AppState>,
    Identity(identity): Identity,
) -> Result<Response, AppError> {
    let repo = CartRepository::new(state.pool());
    match repo.resolve(&identity, false).await? {
        None => Ok(Json(json!({ "detail": "Cart is empty." })).into_response()),
        Some(cart) => Ok(Json(repo.snapshot(cart.id).await?).into_response()),
    }
}

/// Add or increment an item.
#[instrument(skip(state, identity))]
pub async fn add_item(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(payload): Json<AddItemPayload>,
) -> Result<Json<CartSnapshot>, AppError> {
    let cart = require_cart(&state, &identity).await?;
    let repo = CartRepository::new(state.pool());
    repo.add_item(&cart, payload.product_id, payload.quantity)
        .await?;
    Ok(Json(repo.snapshot(cart.id).await?))
}

/// Remove an item from the cart.
#[instrument(skip(state, identity))]
pub async fn remove_item(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(payload): Json<RemoveItemPayload>,
) -> Result<Response, AppError> {
    let cart = require_cart(&state, &identity).await?;
    let repo = CartRepository::new(state.pool());
    match repo.remove_item(&cart, payload.item_id).await {
        Ok(()) => Ok(Json(repo.snapshot(cart.id).await?).into_response()),
        Err(OrderError::NotFound) => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Item not in cart" })),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Increment a line by one, creating it if absent.
#[instrument(skip(state, identity))]
pub async fn increase_item(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(payload): Json<ProductRefPayload>,
) -> Result<Json<CartSnapshot>, AppError> {
    let cart = require_cart(&state, &identity).await?;
    let repo = CartRepository::new(state.pool());
    repo.adjust_quantity(&cart, payload.product_id, 1)
        .await
        .map_err(|e| match e {
            OrderError::NotFound => AppError::NotFound("Not found.".to_string()),
            other => other.into(),
        })?;
    Ok(Json(repo.snapshot(cart.id).await?))
}

/// Decrement a line by one, deleting it at zero.
#[instrument(skip(state, identity))]
pub async fn decrease_item(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(payload): Json<ProductRefPayload>,
) -> Result<Json<CartSnapshot>, AppError> {
    let cart = require_cart(&state, &identity).await?;
    let repo = CartRepository::new(state.pool());
    repo.adjust_quantity(&cart, payload.product_id, -1)
        .await
        .map_err(|e| match e {
            OrderError::NotFound => AppError::NotFound("Item not found in cart.".to_string()),
            other => other.into(),
        })?;
    Ok(Json(repo.snapshot(cart.id).await?))
}

/// Checkout: pay the cart, deducting stock.
#[instrument(skip(state, identity, payload))]
pub async fn checkout(
    State(state): State<AppState>,
    Identity(identity): Identity,
    payload: Option<Json<CheckoutPayload>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cart = require_cart(&state, &identity).await?;
    let cart_repo = CartRepository::new(state.pool());
    let order_repo = OrderRepository::new(state.pool());

    let snapshot = cart_repo.snapshot(cart.id).await?;
    if snapshot.items.is_empty() {
        return Err(AppError::Validation("Your cart is empty.".to_string()));
    }

    if let Some(address) = payload.and_then(|Json(p)| p.shipping_address) {
        order_repo.set_shipping_address(cart.id, &address).await?;
    }

    order_repo.pay(cart.id).await?;
    let detail = order_repo.detail(cart.id).await?;

    Ok(Json(json!({
        "detail": format!("Order #{} checked out successfully!", cart.id),
        "order": detail,
    })))
}
