//! Storage seams.
//!
//! Every workflow talks to storage through these traits so the HTTP layer can
//! hold an `Arc<dyn ShopStore>` and tests can swap in [`memory::MemoryStore`].
//! Multi-statement operations (`reserve_cart_lines`, `insert_products`,
//! `create_order`, cart removal) are atomic in every implementation.

#[cfg(feature = "memory")]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::auth::{Credentials, NewUser, Profile, Role};
use crate::models::cart::{CartItem, CartLineView};
use crate::models::catalog::{NewProduct, Product, ProductPatch, ProductSummary};
use crate::models::order::{Order, OrderDraft, OrderStatus};

pub use postgres::PgStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Product {0} not found")]
    ProductNotFound(i64),

    #[error("Insufficient stock for product {product_id} (requested {requested})")]
    InsufficientStock { product_id: i64, requested: i32 },

    #[error("An admin account already exists")]
    AdminExists,

    #[error("Order {0} changed status concurrently")]
    StaleStatus(i64),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user, returning its id. Duplicate username or email is a
    /// [`StoreError::Conflict`].
    async fn create_user(&self, user: &NewUser) -> Result<i64, StoreError>;

    /// Insert a user only if no admin exists, checked and inserted
    /// atomically. Otherwise [`StoreError::AdminExists`].
    async fn create_user_unless_admin_exists(&self, user: &NewUser) -> Result<i64, StoreError>;

    /// Look a user up by username or email for login.
    async fn find_credentials(
        &self,
        username_or_email: &str,
    ) -> Result<Option<Credentials>, StoreError>;

    async fn find_profile(&self, username: &str) -> Result<Option<Profile>, StoreError>;

    async fn find_user_id(&self, username: &str) -> Result<Option<i64>, StoreError>;

    /// Current role of a user. Never cached.
    async fn find_role(&self, username: &str) -> Result<Option<Role>, StoreError>;

    async fn admin_exists(&self) -> Result<bool, StoreError>;
}

/// Product catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<ProductSummary>, StoreError>;

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>, StoreError>;

    /// Insert every product or none of them.
    async fn insert_products(&self, products: &[NewProduct]) -> Result<Vec<i64>, StoreError>;

    /// Returns `false` if the product does not exist.
    async fn update_product(&self, product_id: i64, patch: &ProductPatch)
    -> Result<bool, StoreError>;

    /// Returns `false` if the product does not exist.
    async fn delete_product(&self, product_id: i64) -> Result<bool, StoreError>;
}

/// Per-user cart lines and the stock they hold.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Reserve every item, in order, or none of them.
    ///
    /// Each item decrements stock with a conditional update; the first item
    /// that cannot be satisfied aborts the batch with
    /// [`StoreError::ProductNotFound`] or [`StoreError::InsufficientStock`]
    /// and nothing from the batch remains visible.
    async fn reserve_cart_lines(
        &self,
        user_id: i64,
        items: &[CartItem],
    ) -> Result<Vec<i64>, StoreError>;

    async fn list_cart_lines(&self, user_id: i64) -> Result<Vec<CartLineView>, StoreError>;

    /// Delete one line owned by `user_id` and return its quantity to stock.
    /// Returns the number of lines removed (0 or 1).
    async fn remove_cart_line(&self, user_id: i64, line_id: i64) -> Result<u64, StoreError>;

    /// Delete all lines owned by `user_id` and return their quantities to
    /// stock. Returns the number of lines removed.
    async fn clear_cart(&self, user_id: i64) -> Result<u64, StoreError>;
}

/// Orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist the order and consume the owner's cart lines in one
    /// transaction. Consumed lines do not return stock.
    async fn create_order(&self, user_id: i64, draft: &OrderDraft) -> Result<Order, StoreError>;

    async fn list_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError>;

    async fn list_all_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Ownership is part of the lookup: another user's order is `None`.
    async fn find_order_for_user(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Option<Order>, StoreError>;

    async fn find_order(&self, order_id: i64) -> Result<Option<Order>, StoreError>;

    /// Compare-and-set: writes `to` only while the order is still `from`,
    /// otherwise [`StoreError::StaleStatus`].
    async fn update_order_status(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<(), StoreError>;
}

/// Everything the HTTP layer needs from storage.
pub trait ShopStore: UserStore + CatalogStore + CartStore + OrderStore {}

impl<T> ShopStore for T where T: UserStore + CatalogStore + CartStore + OrderStore {}
