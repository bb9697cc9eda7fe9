//! Integration tests for the HTTP error contract.
//!
//! Clients match on these exact status codes and `{"detail": ...}` bodies,
//! so they are pinned here end to end: domain error → `AppError` → response.

use axum::http::StatusCode;
use axum::response::IntoResponse;

use longbox_server::db::{OrderError, RepositoryError};
use longbox_server::error::AppError;

/// Render an error to (status, parsed JSON body).
async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).expect("JSON body");
    (status, body)
}

#[tokio::test]
async fn test_insufficient_stock_is_400_with_message() {
    let err: AppError = OrderError::InsufficientStock("Not enough stock for Watchmen".to_string()).into();
    let (status, body) = render(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Not enough stock for Watchmen");
}

#[tokio::test]
async fn test_validation_is_400_with_message() {
    let err: AppError =
        OrderError::Validation("Product with ID 99 does not exist.".to_string()).into();
    let (status, body) = render(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Product with ID 99 does not exist.");
}

#[tokio::test]
async fn test_empty_cart_checkout_body() {
    let (status, body) = render(AppError::Validation("Your cart is empty.".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Your cart is empty.");
}

#[tokio::test]
async fn test_not_found_is_404() {
    let (status, body) = render(AppError::NotFound("Item not found in cart.".to_string())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Item not found in cart.");
}

#[tokio::test]
async fn test_database_errors_are_opaque_500s() {
    let err: AppError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
    let (status, body) = render(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Internal details must never reach the client
    assert_eq!(body["detail"], "Internal server error");
}

#[tokio::test]
async fn test_conflict_is_409() {
    let err: AppError =
        RepositoryError::Conflict("product is referenced by existing orders".to_string()).into();
    let (status, body) = render(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "product is referenced by existing orders");
}

#[tokio::test]
async fn test_auth_errors() {
    let (status, _) = render(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = render(AppError::Forbidden).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Staff access required");
}

/// The duplicate-pending-cart race is recovered internally by the resolver;
/// there is no error variant for it to surface.
#[test]
fn test_no_invariant_violation_variant_exists() {
    // Compile-time contract: OrderError covers exactly these cases.
    fn classify(err: &OrderError) -> &'static str {
        match err {
            OrderError::InsufficientStock(_) => "stock",
            OrderError::Validation(_) => "validation",
            OrderError::NotFound => "not_found",
            OrderError::Repository(_) => "repository",
        }
    }
    assert_eq!(classify(&OrderError::NotFound), "not_found");
}
