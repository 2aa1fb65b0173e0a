//! Domain models shared by the store backends and the HTTP layer.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod order;
