//! Order route handlers: listing, direct purchase, and lifecycle actions.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde_json::json;
use tracing::instrument;

use longbox_core::OrderId;

use crate::db::OrderRepository;
use crate::db::orders::CreateOrderInput;
use crate::error::AppError;
use crate::middleware::{CurrentUser, Identity};
use crate::models::order::OrderDetail;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show))
        .route("/{id}/pay", post(pay))
        .route("/{id}/cancel", post(cancel))
        .route("/{id}/refund", post(refund))
}

/// List orders: staff sees everything, everyone else their own.
#[instrument(skip(state, identity, user))]
pub async fn index(
    State(state): State<AppState>,
    Identity(identity): Identity,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<OrderDetail>>, AppError> {
    let repo = OrderRepository::new(state.pool());
    let is_staff = user.is_some_and(|u| u.role().is_staff());
    let orders = repo
        .list_for(if is_staff { None } else { Some(&identity) })
        .await?;

    let mut details = Vec::with_capacity(orders.len());
    for order in &orders {
        let items = repo.item_details(order.id).await?;
        details.push(OrderDetail::new(order, items));
    }
    Ok(Json(details))
}

/// Direct purchase: create and pay an order without a cart.
#[instrument(skip(state, identity, input))]
pub async fn create(
    State(state): State<AppState>,
    Identity(identity): Identity,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<OrderDetail>), AppError> {
    let detail = OrderRepository::new(state.pool())
        .create_direct(&identity, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// Order detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>, AppError> {
    let detail = OrderRepository::new(state.pool()).detail(id).await?;
    Ok(Json(detail))
}

/// Mark an order as paid. Idempotent.
#[instrument(skip(state))]
pub async fn pay(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let order = OrderRepository::new(state.pool()).pay(id).await?;
    Ok(Json(json!({
        "detail": format!("Order #{} marked as paid.", order.id)
    })))
}

/// Cancel an order, restoring stock. No-op unless paid or shipped.
#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let order = OrderRepository::new(state.pool()).cancel(id).await?;
    Ok(Json(json!({
        "detail": format!("Order #{} cancelled.", order.id)
    })))
}

/// Refund an order, restoring stock. No-op unless paid.
#[instrument(skip(state))]
pub async fn refund(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let order = OrderRepository::new(state.pool()).refund(id).await?;
    Ok(Json(json!({
        "detail": format!("Order #{} refunded.", order.id)
    })))
}
