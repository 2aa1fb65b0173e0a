//! Cart request handlers. All scoped to the caller.

use axum::extract::State;
use shop_core::models::cart::{CartItem, CartLineView};

use crate::AppState;
use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CartLineRef, MessageResponse};
use crate::services::cart;

/// `GET /cart`
pub async fn list_cart_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<CartLineView>>> {
    Ok(Json(cart::list_cart(state.store.as_ref(), &user).await?))
}

/// `POST /cart/add`: body is an array of `{product_id, quantity}`.
pub async fn add_to_cart_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<Vec<CartItem>>,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(cart::add_to_cart(state.store.as_ref(), &user, body).await?))
}

/// `POST /cart/remove`: body is `{id}` of a cart line.
pub async fn remove_from_cart_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CartLineRef>,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(
        cart::remove_line(state.store.as_ref(), &user, body.id).await?,
    ))
}

/// `DELETE /cart/clear`
pub async fn clear_cart_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(cart::clear_cart(state.store.as_ref(), &user).await?))
}
