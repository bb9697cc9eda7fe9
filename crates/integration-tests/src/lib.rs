//! Integration tests for Longbox.
//!
//! # Test Categories
//!
//! - `order_lifecycle` - The status state machine and its no-op rules
//! - `cart_semantics` - Identity resolution rules, totals, payload shapes
//!
//! These tests exercise the cross-crate contracts (core types + server
//! models) without requiring a running database or server; the SQL side of
//! the repositories is covered by the constraints in the migrations and is
//! exercised against a live `PostgreSQL` in deployment smoke tests.

pub mod fixtures;
