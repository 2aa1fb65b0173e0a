//! PostgreSQL-backed store, delegating to the per-domain query modules.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{CartStore, CatalogStore, OrderStore, StoreError, UserStore};
use crate::models::auth::{Credentials, NewUser, Profile, Role};
use crate::models::cart::{CartItem, CartLineView};
use crate::models::catalog::{NewProduct, Product, ProductPatch, ProductSummary};
use crate::models::order::{Order, OrderDraft, OrderStatus};
use crate::{auth, cart, catalog, orders};

/// Store over a shared PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: &NewUser) -> Result<i64, StoreError> {
        auth::queries::create_user(&self.pool, user).await
    }

    async fn create_user_unless_admin_exists(&self, user: &NewUser) -> Result<i64, StoreError> {
        auth::queries::create_user_unless_admin_exists(&self.pool, user).await
    }

    async fn find_credentials(
        &self,
        username_or_email: &str,
    ) -> Result<Option<Credentials>, StoreError> {
        auth::queries::find_credentials(&self.pool, username_or_email).await
    }

    async fn find_profile(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        auth::queries::find_profile(&self.pool, username).await
    }

    async fn find_user_id(&self, username: &str) -> Result<Option<i64>, StoreError> {
        auth::queries::find_user_id(&self.pool, username).await
    }

    async fn find_role(&self, username: &str) -> Result<Option<Role>, StoreError> {
        auth::queries::find_role(&self.pool, username).await
    }

    async fn admin_exists(&self) -> Result<bool, StoreError> {
        auth::queries::admin_exists(&self.pool).await
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_products(&self) -> Result<Vec<ProductSummary>, StoreError> {
        catalog::list_products(&self.pool).await
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>, StoreError> {
        catalog::get_product(&self.pool, product_id).await
    }

    async fn insert_products(&self, products: &[NewProduct]) -> Result<Vec<i64>, StoreError> {
        catalog::insert_products(&self.pool, products).await
    }

    async fn update_product(
        &self,
        product_id: i64,
        patch: &ProductPatch,
    ) -> Result<bool, StoreError> {
        catalog::update_product(&self.pool, product_id, patch).await
    }

    async fn delete_product(&self, product_id: i64) -> Result<bool, StoreError> {
        catalog::delete_product(&self.pool, product_id).await
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn reserve_cart_lines(
        &self,
        user_id: i64,
        items: &[CartItem],
    ) -> Result<Vec<i64>, StoreError> {
        cart::reserve_cart_lines(&self.pool, user_id, items).await
    }

    async fn list_cart_lines(&self, user_id: i64) -> Result<Vec<CartLineView>, StoreError> {
        cart::list_cart_lines(&self.pool, user_id).await
    }

    async fn remove_cart_line(&self, user_id: i64, line_id: i64) -> Result<u64, StoreError> {
        cart::remove_cart_line(&self.pool, user_id, line_id).await
    }

    async fn clear_cart(&self, user_id: i64) -> Result<u64, StoreError> {
        cart::clear_cart(&self.pool, user_id).await
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, user_id: i64, draft: &OrderDraft) -> Result<Order, StoreError> {
        orders::create_order(&self.pool, user_id, draft).await
    }

    async fn list_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        orders::list_orders_for_user(&self.pool, user_id).await
    }

    async fn list_all_orders(&self) -> Result<Vec<Order>, StoreError> {
        orders::list_all_orders(&self.pool).await
    }

    async fn find_order_for_user(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Option<Order>, StoreError> {
        orders::find_order_for_user(&self.pool, user_id, order_id).await
    }

    async fn find_order(&self, order_id: i64) -> Result<Option<Order>, StoreError> {
        orders::find_order(&self.pool, order_id).await
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<(), StoreError> {
        orders::update_order_status(&self.pool, order_id, from, to).await
    }
}
