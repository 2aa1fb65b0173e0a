//! # shop_core
//!
//! Core domain logic for the store backend: accounts, catalog, cart
//! reservations and orders, plus the storage seams they run against.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod migrate;
pub mod models;
pub mod orders;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
