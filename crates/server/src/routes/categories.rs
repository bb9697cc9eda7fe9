//! Category route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use tracing::instrument;

use longbox_core::CategoryId;

use crate::db::CategoryRepository;
use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::models::category::{Category, CreateCategoryInput};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show))
}

/// List all categories.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// Category detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Category>, AppError> {
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found.".to_string()))?;
    Ok(Json(category))
}

/// Create a category (staff only).
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Json(input): Json<CreateCategoryInput>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = CategoryRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
