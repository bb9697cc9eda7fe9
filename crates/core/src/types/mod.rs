//! Core types for Longbox.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod identity;
pub mod role;
pub mod status;

pub use id::*;
pub use identity::CartIdentity;
pub use role::Role;
pub use status::OrderStatus;
