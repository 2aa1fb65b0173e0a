//! Shared harness: the real router over an in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, Utc};
use serde_json::Value;
use shop_api::AppState;
use shop_api::config::ApiConfig;
use shop_core::models::auth::{NewUser, Role};
use shop_core::models::catalog::NewProduct;
use shop_core::store::memory::MemoryStore;
use shop_core::store::{CatalogStore, ShopStore, UserStore};
use tower::ServiceExt;

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(false)
    }

    pub fn with_config(allow_admin_signup: bool) -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = ApiConfig {
            bind_addr: "127.0.0.1:0".into(),
            database_url: String::new(),
            jwt_secret: "test-secret".into(),
            allow_admin_signup,
        };
        let state = AppState::new(store.clone() as Arc<dyn ShopStore>, config);
        let router = shop_api::router(state.clone());
        Self {
            state,
            store,
            router,
        }
    }

    /// Seed an account directly and return a valid token for it.
    pub async fn user(&self, username: &str, role: Role) -> String {
        self.store
            .create_user(&NewUser {
                username: username.into(),
                email: format!("{username}@example.com"),
                password_hash: "not-a-real-hash".into(),
                role,
            })
            .await
            .expect("seed user");
        self.token_for(username)
    }

    pub fn token_for(&self, username: &str) -> String {
        self.token_issued_at(username, Utc::now())
    }

    pub fn token_issued_at(&self, username: &str, at: DateTime<Utc>) -> String {
        self.state.tokens.issue(username, at).expect("issue token")
    }

    pub async fn product(&self, name: &str, price: i64, stock: i32) -> i64 {
        self.store
            .insert_products(&[NewProduct {
                name: name.into(),
                description: format!("{name} description"),
                price,
                stock,
                image: format!("{name}.png"),
            }])
            .await
            .expect("seed product")[0]
    }

    pub async fn stock(&self, product_id: i64) -> i32 {
        self.store
            .get_product(product_id)
            .await
            .expect("get product")
            .expect("product exists")
            .stock
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, token, Some(body)).await
    }
}
