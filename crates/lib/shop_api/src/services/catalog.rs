//! Product catalog operations. Writes require an [`AdminUser`].

use shop_core::models::catalog::{NewProduct, Product, ProductPatch, ProductSummary};
use shop_core::store::ShopStore;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{MessageResponse, ProductsCreatedResponse};
use crate::services::access::AdminUser;

pub async fn list_products(store: &dyn ShopStore) -> AppResult<Vec<ProductSummary>> {
    Ok(store.list_products().await?)
}

pub async fn get_product(store: &dyn ShopStore, product_id: i64) -> AppResult<Product> {
    store
        .get_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))
}

fn validate_new_product(product: &NewProduct) -> AppResult<()> {
    if product.name.trim().is_empty() {
        return Err(AppError::Validation("Product name is required".into()));
    }
    if product.price < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    if product.stock < 0 {
        return Err(AppError::Validation("Stock must not be negative".into()));
    }
    Ok(())
}

/// Insert a batch of products; all of them or none.
pub async fn create_products(
    store: &dyn ShopStore,
    admin: &AdminUser,
    products: Vec<NewProduct>,
) -> AppResult<ProductsCreatedResponse> {
    if products.is_empty() {
        return Err(AppError::Validation("No products submitted".into()));
    }
    products.iter().try_for_each(validate_new_product)?;

    let ids = store.insert_products(&products).await?;
    info!(admin = admin.username(), count = ids.len(), "products created");
    Ok(ProductsCreatedResponse {
        message: "Products posted!".into(),
        ids,
    })
}

/// Apply a partial update. Blank and zero fields are left unchanged.
pub async fn update_product(
    store: &dyn ShopStore,
    admin: &AdminUser,
    product_id: i64,
    patch: ProductPatch,
) -> AppResult<MessageResponse> {
    if patch.price.is_some_and(|p| p < 0) || patch.stock.is_some_and(|s| s < 0) {
        return Err(AppError::Validation(
            "Price and stock must not be negative".into(),
        ));
    }

    let patch = patch.normalized();
    if !store.update_product(product_id, &patch).await? {
        return Err(AppError::NotFound("Product not found".into()));
    }
    info!(admin = admin.username(), product_id, "product updated");
    Ok(MessageResponse::new("Updated successfully!"))
}

pub async fn delete_product(
    store: &dyn ShopStore,
    admin: &AdminUser,
    product_id: i64,
) -> AppResult<MessageResponse> {
    if !store.delete_product(product_id).await? {
        return Err(AppError::NotFound("Product not found".into()));
    }
    info!(admin = admin.username(), product_id, "product deleted");
    Ok(MessageResponse::new("Deleted successfully!"))
}
