//! Unified error handling for the server.
//!
//! The JSON bodies here are part of the public API: client-facing failures
//! are `{"detail": "<message>"}` with the message passed through verbatim,
//! which is why the client-facing variants format as their bare message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::{OrderError, RepositoryError};

/// Application-level error type for route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Client input is malformed (missing product, quantity < 1, ...).
    #[error("{0}")]
    Validation(String),

    /// A product cannot cover the requested quantity.
    #[error("{0}")]
    InsufficientStock(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Write conflicts with existing data (e.g. product referenced by orders).
    #[error("{0}")]
    Conflict(String),

    /// User is not authenticated.
    #[error("Authentication required")]
    Unauthorized,

    /// User lacks permission.
    #[error("Staff access required")]
    Forbidden,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("Not found".to_string()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InsufficientStock(msg) => Self::InsufficientStock(msg),
            OrderError::Validation(msg) => Self::Validation(msg),
            OrderError::NotFound => Self::NotFound("Not found".to_string()),
            OrderError::Repository(repo) => repo.into(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(RepositoryError::Database(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) | Self::InsufficientStock(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display_is_bare_message() {
        let err = AppError::InsufficientStock("Not enough stock for Saga #1".to_string());
        assert_eq!(err.to_string(), "Not enough stock for Saga #1");

        let err = AppError::NotFound("Item not found in cart.".to_string());
        assert_eq!(err.to_string(), "Item not found in cart.");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::InsufficientStock("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Conflict("x".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_order_error_mapping() {
        let err: AppError = OrderError::InsufficientStock("Not enough stock for X".to_string()).into();
        assert!(matches!(err, AppError::InsufficientStock(_)));

        let err: AppError = OrderError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
