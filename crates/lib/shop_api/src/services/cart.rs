//! Cart operations for the calling user.

use shop_core::models::cart::{CartItem, CartLineView};
use shop_core::store::ShopStore;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::MessageResponse;
use crate::services::access::resolve_user_id;

fn validate_items(items: &[CartItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::Validation("No items submitted".into()));
    }
    for item in items {
        if item.product_id <= 0 {
            return Err(AppError::Validation(format!(
                "Invalid product id {}",
                item.product_id
            )));
        }
        if item.quantity <= 0 {
            return Err(AppError::Validation(format!(
                "Quantity for product {} must be positive",
                item.product_id
            )));
        }
    }
    Ok(())
}

/// Reserve every item in `items` or none of them.
pub async fn add_to_cart(
    store: &dyn ShopStore,
    user: &AuthenticatedUser,
    items: Vec<CartItem>,
) -> AppResult<MessageResponse> {
    validate_items(&items)?;
    let user_id = resolve_user_id(store, user).await?;

    let line_ids = store.reserve_cart_lines(user_id, &items).await?;
    info!(
        username = user.username(),
        lines = line_ids.len(),
        "cart lines reserved"
    );
    Ok(MessageResponse::new("Cart added successfully!"))
}

pub async fn list_cart(
    store: &dyn ShopStore,
    user: &AuthenticatedUser,
) -> AppResult<Vec<CartLineView>> {
    let user_id = resolve_user_id(store, user).await?;
    Ok(store.list_cart_lines(user_id).await?)
}

/// Remove one of the caller's lines. Removing a line that is absent or
/// belongs to someone else succeeds and changes nothing.
pub async fn remove_line(
    store: &dyn ShopStore,
    user: &AuthenticatedUser,
    line_id: i64,
) -> AppResult<MessageResponse> {
    let user_id = resolve_user_id(store, user).await?;
    let removed = store.remove_cart_line(user_id, line_id).await?;
    info!(username = user.username(), line_id, removed, "cart line removed");
    Ok(MessageResponse::new("Deleted successfully"))
}

pub async fn clear_cart(
    store: &dyn ShopStore,
    user: &AuthenticatedUser,
) -> AppResult<MessageResponse> {
    let user_id = resolve_user_id(store, user).await?;
    let removed = store.clear_cart(user_id).await?;
    info!(username = user.username(), removed, "cart cleared");
    Ok(MessageResponse::new("Cleared successfully"))
}
