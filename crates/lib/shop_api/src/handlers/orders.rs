//! Order request handlers.

use axum::extract::State;

use super::parse_id;
use crate::AppState;
use crate::error::AppResult;
use crate::extract::{Json, Path};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    AdminOrderView, CreateOrderRequest, CreateOrderResponse, MessageResponse, OrderView,
    UpdateStatusRequest,
};
use crate::services::{access, orders};

/// `GET /orders`: the caller's orders.
pub async fn list_orders_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<OrderView>>> {
    Ok(Json(orders::list_own_orders(state.store.as_ref(), &user).await?))
}

/// `POST /orders`: place an order from the caller's cart.
pub async fn create_order_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateOrderRequest>,
) -> AppResult<Json<CreateOrderResponse>> {
    Ok(Json(
        orders::create_order(state.store.as_ref(), &user, body).await?,
    ))
}

/// `GET /orders/{id}`: one of the caller's orders.
pub async fn get_order_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let id = parse_id(&id)?;
    Ok(Json(orders::get_order(state.store.as_ref(), &user, id).await?))
}

/// `GET /orders/getall`: admin only.
pub async fn list_all_orders_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<AdminOrderView>>> {
    let admin = access::require_admin(state.store.as_ref(), &user).await?;
    Ok(Json(
        orders::list_all_orders(state.store.as_ref(), &admin).await?,
    ))
}

/// `POST /orders/update`: admin only; body is `{id, status}`.
pub async fn update_status_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateStatusRequest>,
) -> AppResult<Json<MessageResponse>> {
    let admin = access::require_admin(state.store.as_ref(), &user).await?;
    Ok(Json(
        orders::update_status(state.store.as_ref(), &admin, body).await?,
    ))
}
