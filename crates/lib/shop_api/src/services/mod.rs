//! Business workflows behind the handlers.
//!
//! Services take the store as `&dyn ShopStore` and the caller's identity as
//! an explicit argument; admin-only operations additionally require an
//! [`access::AdminUser`], which only the role gate can produce.

pub mod access;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
