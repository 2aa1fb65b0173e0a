//! Order placement, listing and the admin status workflow.

use chrono::Utc;
use shop_core::models::order::{OrderDraft, OrderStatus};
use shop_core::store::ShopStore;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    AdminOrderView, CreateOrderRequest, CreateOrderResponse, MessageResponse, OrderView,
    UpdateStatusRequest,
};
use crate::services::access::{AdminUser, resolve_user_id};

fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.parse::<OrderStatus>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Turn a client request into a draft. New orders always start `pending`.
fn draft_from_request(req: CreateOrderRequest) -> AppResult<OrderDraft> {
    let status = match req.status.as_deref().map(str::trim) {
        None | Some("") => OrderStatus::Pending,
        Some(raw) => parse_status(raw)?,
    };
    if status != OrderStatus::Pending {
        return Err(AppError::Validation(
            "New orders must start as pending".into(),
        ));
    }
    if req.total_price < 0 {
        return Err(AppError::Validation(
            "Total price must not be negative".into(),
        ));
    }
    Ok(OrderDraft {
        status,
        total_price: req.total_price,
        created_at: req.created_at.unwrap_or_else(Utc::now),
    })
}

/// Place an order for the caller. The caller's cart lines are consumed.
pub async fn create_order(
    store: &dyn ShopStore,
    user: &AuthenticatedUser,
    req: CreateOrderRequest,
) -> AppResult<CreateOrderResponse> {
    let draft = draft_from_request(req)?;
    let user_id = resolve_user_id(store, user).await?;

    let order = store.create_order(user_id, &draft).await?;
    info!(
        username = user.username(),
        order_id = order.id,
        total_price = order.total_price,
        "order created"
    );
    Ok(CreateOrderResponse {
        message: "order created!".into(),
        id: order.id,
    })
}

pub async fn list_own_orders(
    store: &dyn ShopStore,
    user: &AuthenticatedUser,
) -> AppResult<Vec<OrderView>> {
    let user_id = resolve_user_id(store, user).await?;
    let orders = store.list_orders_for_user(user_id).await?;
    Ok(orders.into_iter().map(OrderView::from).collect())
}

pub async fn list_all_orders(
    store: &dyn ShopStore,
    _admin: &AdminUser,
) -> AppResult<Vec<AdminOrderView>> {
    let orders = store.list_all_orders().await?;
    Ok(orders.into_iter().map(AdminOrderView::from).collect())
}

/// One of the caller's orders. Someone else's order is reported as missing.
pub async fn get_order(
    store: &dyn ShopStore,
    user: &AuthenticatedUser,
    order_id: i64,
) -> AppResult<OrderView> {
    let user_id = resolve_user_id(store, user).await?;
    store
        .find_order_for_user(user_id, order_id)
        .await?
        .map(OrderView::from)
        .ok_or_else(|| AppError::NotFound("Order not found".into()))
}

/// Move an order to a new status along the allowed workflow.
pub async fn update_status(
    store: &dyn ShopStore,
    admin: &AdminUser,
    req: UpdateStatusRequest,
) -> AppResult<MessageResponse> {
    let next = parse_status(&req.status)?;
    let order = store
        .find_order(req.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    if !order.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Cannot move order from {} to {}",
            order.status, next
        )));
    }

    if order.status != next {
        store.update_order_status(order.id, order.status, next).await?;
        info!(
            admin = admin.username(),
            order_id = order.id,
            from = %order.status,
            to = %next,
            "order status updated"
        );
    }
    Ok(MessageResponse::new("updated!"))
}
