//! Catalog request handlers.

use axum::extract::State;
use shop_core::models::catalog::{NewProduct, Product, ProductPatch, ProductSummary};

use super::parse_id;
use crate::AppState;
use crate::error::AppResult;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{MessageResponse, ProductsCreatedResponse};
use crate::services::{access, catalog};

/// `GET /products`: public listing.
pub async fn list_products_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ProductSummary>>> {
    Ok(Json(catalog::list_products(state.store.as_ref()).await?))
}

/// `GET /products/{id}`: public product detail.
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let id = parse_id(&id)?;
    Ok(Json(catalog::get_product(state.store.as_ref(), id).await?))
}

/// `POST /products`: admin only; body is an array of products.
pub async fn create_products_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<Vec<NewProduct>>,
) -> AppResult<Json<ProductsCreatedResponse>> {
    let admin = access::require_admin(state.store.as_ref(), &user).await?;
    let resp = catalog::create_products(state.store.as_ref(), &admin, body).await?;
    Ok(Json(resp))
}

/// `PUT /products/{id}`: admin only.
pub async fn update_product_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(body): Json<ProductPatch>,
) -> AppResult<Json<MessageResponse>> {
    let admin = access::require_admin(state.store.as_ref(), &user).await?;
    let id = parse_id(&id)?;
    let resp = catalog::update_product(state.store.as_ref(), &admin, id, body).await?;
    Ok(Json(resp))
}

/// `DELETE /products/{id}`: admin only.
pub async fn delete_product_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let admin = access::require_admin(state.store.as_ref(), &user).await?;
    let id = parse_id(&id)?;
    let resp = catalog::delete_product(state.store.as_ref(), &admin, id).await?;
    Ok(Json(resp))
}
