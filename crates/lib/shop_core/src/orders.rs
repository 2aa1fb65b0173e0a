//! Order persistence.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::order::{Order, OrderDraft, OrderStatus};
use crate::store::StoreError;

/// Row returned by order queries. `status` is stored as text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|e| StoreError::Decode(format!("order {}: {e}", row.id)))?;
        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            status,
            total_price: row.total_price,
            created_at: row.created_at,
        })
    }
}

fn into_orders(rows: Vec<OrderRow>) -> Result<Vec<Order>, StoreError> {
    rows.into_iter().map(Order::try_from).collect()
}

/// Persist an order and consume the owner's cart in one transaction.
pub async fn create_order(
    pool: &PgPool,
    user_id: i64,
    draft: &OrderDraft,
) -> Result<Order, StoreError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, OrderRow>(
        r#"
        INSERT INTO orders (user_id, status, total_price, created_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, status, total_price, created_at
        "#,
    )
    .bind(user_id)
    .bind(draft.status.as_str())
    .bind(draft.total_price)
    .bind(draft.created_at)
    .fetch_one(&mut *tx)
    .await?;

    // Held stock is now sold: drop the lines without releasing it.
    sqlx::query("DELETE FROM cart WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Order::try_from(row)
}

/// List a user's orders, oldest first.
pub async fn list_orders_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Order>, StoreError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT id, user_id, status, total_price, created_at
        FROM orders
        WHERE user_id = $1
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    into_orders(rows)
}

/// List every order.
pub async fn list_all_orders(pool: &PgPool) -> Result<Vec<Order>, StoreError> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT id, user_id, status, total_price, created_at FROM orders ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    into_orders(rows)
}

/// Get an order by ID (scoped to user).
pub async fn find_order_for_user(
    pool: &PgPool,
    user_id: i64,
    order_id: i64,
) -> Result<Option<Order>, StoreError> {
    let row = sqlx::query_as::<_, OrderRow>(
        r#"
        SELECT id, user_id, status, total_price, created_at
        FROM orders
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    row.map(Order::try_from).transpose()
}

/// Get an order by ID regardless of owner.
pub async fn find_order(pool: &PgPool, order_id: i64) -> Result<Option<Order>, StoreError> {
    let row = sqlx::query_as::<_, OrderRow>(
        "SELECT id, user_id, status, total_price, created_at FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?;
    row.map(Order::try_from).transpose()
}

/// Overwrite the status only if it is still `from`.
pub async fn update_order_status(
    pool: &PgPool,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), StoreError> {
    let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2 AND status = $3")
        .bind(to.as_str())
        .bind(order_id)
        .bind(from.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::StaleStatus(order_id));
    }
    Ok(())
}
