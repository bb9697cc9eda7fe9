//! Product route handlers (catalog reads plus staff-gated writes).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::instrument;

use longbox_core::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::models::product::{CreateProductInput, Product, ProductFilter, UpdateProductInput};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
        .route("/{id}/toggle_trending", post(toggle_trending))
}

/// List products with filtering, ordering, and pagination.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(products))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found.".to_string()))?;
    Ok(Json(product))
}

/// Create a product (staff only).
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    validate_price(input.price)?;
    let product = ProductRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product (staff only). Stock writes recompute `is_active`.
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> Result<Json<Product>, AppError> {
    if let Some(price) = input.price {
        validate_price(price)?;
    }
    let product = ProductRepository::new(state.pool()).update(id, &input).await?;
    Ok(Json(product))
}

/// Delete a product (staff only). Refused while orders reference it.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, AppError> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound("Not found.".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Flip the trending flag (staff only).
#[instrument(skip(state))]
pub async fn toggle_trending(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let product = ProductRepository::new(state.pool()).toggle_trending(id).await?;
    Ok(Json(json!({ "id": product.id, "trending": product.trending })))
}

fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::Validation(
            "Price must be non-negative.".to_string(),
        ));
    }
    Ok(())
}
