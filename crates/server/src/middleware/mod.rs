//! Middleware and request extractors.

pub mod identity;
pub mod session;

pub use identity::{CurrentUser, Identity, RequireStaff};
pub use session::create_session_layer;
