//! In-process store.
//!
//! One mutex guards the whole state, so every trait method is atomic and a
//! failed batch leaves nothing behind. Semantics match [`super::PgStore`],
//! including stock holds on cart lines and compare-and-set status updates.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CartStore, CatalogStore, OrderStore, StoreError, UserStore};
use crate::models::auth::{Credentials, NewUser, Profile, Role};
use crate::models::cart::{CartItem, CartLineView};
use crate::models::catalog::{NewProduct, Product, ProductPatch, ProductSummary};
use crate::models::order::{Order, OrderDraft, OrderStatus};

#[derive(Debug, Clone)]
struct UserRow {
    id: i64,
    user: NewUser,
}

#[derive(Debug, Clone, Copy)]
struct CartRow {
    user_id: i64,
    product_id: i64,
    quantity: i32,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    users: Vec<UserRow>,
    products: BTreeMap<i64, Product>,
    cart: BTreeMap<i64, CartRow>,
    orders: BTreeMap<i64, Order>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, username: &str) -> Option<&UserRow> {
        self.users.iter().find(|u| u.user.username == username)
    }

    fn insert_user(&mut self, user: &NewUser) -> Result<i64, StoreError> {
        let taken = self
            .users
            .iter()
            .any(|u| u.user.username == user.username || u.user.email == user.email);
        if taken {
            return Err(StoreError::Conflict(
                "Username or email already exists".into(),
            ));
        }
        let id = self.next_id();
        self.users.push(UserRow {
            id,
            user: user.clone(),
        });
        Ok(id)
    }

    fn release(&mut self, lines: &[CartRow]) {
        for line in lines {
            if let Some(product) = self.products.get_mut(&line.product_id) {
                product.stock += line.quantity;
            }
        }
    }

    fn take_cart_lines(&mut self, keep: impl Fn(i64, &CartRow) -> bool) -> Vec<CartRow> {
        let (removed, kept): (BTreeMap<_, _>, BTreeMap<_, _>) =
            std::mem::take(&mut self.cart)
                .into_iter()
                .partition(|(id, line)| !keep(*id, line));
        self.cart = kept;
        removed.into_values().collect()
    }
}

/// Store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change a user's role in place. Returns `false` if no such user.
    pub async fn set_role(&self, username: &str, role: Role) -> bool {
        let mut state = self.state.lock().await;
        match state.users.iter_mut().find(|u| u.user.username == username) {
            Some(row) => {
                row.user.role = role;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<i64, StoreError> {
        self.state.lock().await.insert_user(user)
    }

    async fn create_user_unless_admin_exists(&self, user: &NewUser) -> Result<i64, StoreError> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.user.role.is_admin()) {
            return Err(StoreError::AdminExists);
        }
        state.insert_user(user)
    }

    async fn find_credentials(
        &self,
        username_or_email: &str,
    ) -> Result<Option<Credentials>, StoreError> {
        let state = self.state.lock().await;
        let found = state
            .user(username_or_email)
            .or_else(|| state.users.iter().find(|u| u.user.email == username_or_email));
        Ok(found.map(|u| Credentials {
            username: u.user.username.clone(),
            password_hash: u.user.password_hash.clone(),
        }))
    }

    async fn find_profile(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.user(username).map(|u| Profile {
            username: u.user.username.clone(),
            email: u.user.email.clone(),
            role: u.user.role,
        }))
    }

    async fn find_user_id(&self, username: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.state.lock().await.user(username).map(|u| u.id))
    }

    async fn find_role(&self, username: &str) -> Result<Option<Role>, StoreError> {
        Ok(self.state.lock().await.user(username).map(|u| u.user.role))
    }

    async fn admin_exists(&self) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        Ok(state.users.iter().any(|u| u.user.role.is_admin()))
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<ProductSummary>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.products.values().map(ProductSummary::from).collect())
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.state.lock().await.products.get(&product_id).cloned())
    }

    async fn insert_products(&self, products: &[NewProduct]) -> Result<Vec<i64>, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(bad) = products.iter().find(|p| p.price < 0 || p.stock < 0) {
            return Err(StoreError::Conflict(format!(
                "product {:?} violates price/stock constraints",
                bad.name
            )));
        }
        let mut ids = Vec::with_capacity(products.len());
        for p in products {
            let id = state.next_id();
            state.products.insert(
                id,
                Product {
                    id,
                    name: p.name.clone(),
                    description: p.description.clone(),
                    price: p.price,
                    stock: p.stock,
                    image: p.image.clone(),
                },
            );
            ids.push(id);
        }
        Ok(ids)
    }

    async fn update_product(
        &self,
        product_id: i64,
        patch: &ProductPatch,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let Some(product) = state.products.get_mut(&product_id) else {
            return Ok(false);
        };
        if let Some(name) = &patch.name {
            product.name = name.clone();
        }
        if let Some(description) = &patch.description {
            product.description = description.clone();
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(image) = &patch.image {
            product.image = image.clone();
        }
        Ok(true)
    }

    async fn delete_product(&self, product_id: i64) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if state.products.remove(&product_id).is_none() {
            return Ok(false);
        }
        state.take_cart_lines(|_, line| line.product_id != product_id);
        Ok(true)
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn reserve_cart_lines(
        &self,
        user_id: i64,
        items: &[CartItem],
    ) -> Result<Vec<i64>, StoreError> {
        let mut state = self.state.lock().await;

        // Work on a scratch copy of stock levels; commit only if all pass.
        let mut stock: HashMap<i64, i32> = HashMap::new();
        for item in items {
            let available = match stock.get(&item.product_id) {
                Some(left) => *left,
                None => state
                    .products
                    .get(&item.product_id)
                    .map(|p| p.stock)
                    .ok_or(StoreError::ProductNotFound(item.product_id))?,
            };
            if available < item.quantity {
                return Err(StoreError::InsufficientStock {
                    product_id: item.product_id,
                    requested: item.quantity,
                });
            }
            stock.insert(item.product_id, available - item.quantity);
        }

        for (product_id, left) in stock {
            if let Some(product) = state.products.get_mut(&product_id) {
                product.stock = left;
            }
        }
        let mut line_ids = Vec::with_capacity(items.len());
        for item in items {
            let id = state.next_id();
            state.cart.insert(
                id,
                CartRow {
                    user_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                },
            );
            line_ids.push(id);
        }
        Ok(line_ids)
    }

    async fn list_cart_lines(&self, user_id: i64) -> Result<Vec<CartLineView>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .cart
            .iter()
            .filter(|(_, line)| line.user_id == user_id)
            .filter_map(|(id, line)| {
                state.products.get(&line.product_id).map(|p| CartLineView {
                    id: *id,
                    product_name: p.name.clone(),
                    product_price: p.price,
                    quantity: line.quantity,
                })
            })
            .collect())
    }

    async fn remove_cart_line(&self, user_id: i64, line_id: i64) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let removed =
            state.take_cart_lines(|id, line| !(id == line_id && line.user_id == user_id));
        state.release(&removed);
        Ok(removed.len() as u64)
    }

    async fn clear_cart(&self, user_id: i64) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let removed = state.take_cart_lines(|_, line| line.user_id != user_id);
        state.release(&removed);
        Ok(removed.len() as u64)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, user_id: i64, draft: &OrderDraft) -> Result<Order, StoreError> {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        let order = Order {
            id,
            user_id,
            status: draft.status,
            total_price: draft.total_price,
            created_at: draft.created_at,
        };
        state.orders.insert(id, order.clone());
        state.take_cart_lines(|_, line| line.user_id != user_id);
        Ok(order)
    }

    async fn list_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.state.lock().await.orders.values().cloned().collect())
    }

    async fn find_order_for_user(
        &self,
        user_id: i64,
        order_id: i64,
    ) -> Result<Option<Order>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .get(&order_id)
            .filter(|o| o.user_id == user_id)
            .cloned())
    }

    async fn find_order(&self, order_id: i64) -> Result<Option<Order>, StoreError> {
        Ok(self.state.lock().await.orders.get(&order_id).cloned())
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        match state.orders.get_mut(&order_id) {
            Some(order) if order.status == from => {
                order.status = to;
                Ok(())
            }
            _ => Err(StoreError::StaleStatus(order_id)),
        }
    }
}
