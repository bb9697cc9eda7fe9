//! Longbox Core - Shared types library.
//!
//! This crate provides common types used across all Longbox components:
//! - `server` - The e-commerce backend (catalog, carts, orders)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the order status state machine, cart identity,
//!   and user role derivation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
