//! # shop_api
//!
//! HTTP API library for the store backend.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use shop_core::auth::jwt::TokenCodec;
use shop_core::store::ShopStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, cart, orders, products, profile};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backing store (PostgreSQL in production).
    pub store: Arc<dyn ShopStore>,
    /// API configuration.
    pub config: ApiConfig,
    /// Token codec keyed with `config.jwt_secret`.
    pub tokens: TokenCodec,
}

impl AppState {
    pub fn new(store: Arc<dyn ShopStore>, config: ApiConfig) -> Self {
        let tokens = TokenCodec::new(config.jwt_secret.as_bytes());
        Self {
            store,
            config,
            tokens,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `shop_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    shop_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::LOGIN, post(auth::login_handler))
        .route(routes::REGISTRATION, post(auth::register_handler))
        .route(routes::PRODUCTS, get(products::list_products_handler))
        .route(routes::PRODUCT_ID, get(products::get_product_handler));

    // Protected routes (require auth)
    let protected = Router::new()
        .route(routes::PROFILE, get(profile::profile_handler))
        .route(routes::PRODUCTS, post(products::create_products_handler))
        .route(
            routes::PRODUCT_ID,
            put(products::update_product_handler).delete(products::delete_product_handler),
        )
        .route(routes::CART, get(cart::list_cart_handler))
        .route(routes::CART_SLASH, get(cart::list_cart_handler))
        .route(routes::CART_ADD, post(cart::add_to_cart_handler))
        .route(routes::CART_REMOVE, post(cart::remove_from_cart_handler))
        .route(routes::CART_CLEAR, delete(cart::clear_cart_handler))
        .route(
            routes::ORDERS,
            get(orders::list_orders_handler).post(orders::create_order_handler),
        )
        .route(
            routes::ORDERS_SLASH,
            get(orders::list_orders_handler).post(orders::create_order_handler),
        )
        .route(routes::ORDERS_ALL, get(orders::list_all_orders_handler))
        .route(routes::ORDERS_UPDATE, post(orders::update_status_handler))
        .route(routes::ORDER_ID, get(orders::get_order_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
