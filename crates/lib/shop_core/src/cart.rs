//! Cart persistence and stock reservation.
//!
//! A cart line holds stock: reserving decrements `products.stock` in the
//! same transaction that inserts the line, and removing a line gives the
//! quantity back. Checkout consumes lines without giving stock back
//! (see [`crate::orders::create_order`]).

use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::models::cart::{CartItem, CartLineView};
use crate::store::StoreError;

/// Reserve a batch of items for `user_id` in one transaction.
///
/// Items are processed in submission order. Each one is a single
/// conditional decrement, so two concurrent batches can never jointly take
/// more than the available stock. The first failing item aborts the batch;
/// dropping the uncommitted transaction rolls back every earlier item.
pub async fn reserve_cart_lines(
    pool: &PgPool,
    user_id: i64,
    items: &[CartItem],
) -> Result<Vec<i64>, StoreError> {
    let mut tx = pool.begin().await?;
    let mut line_ids = Vec::with_capacity(items.len());

    for item in items {
        let reserved = sqlx::query(
            "UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1",
        )
        .bind(item.quantity)
        .bind(item.product_id)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
            )
            .bind(item.product_id)
            .fetch_one(&mut *tx)
            .await?;

            return Err(if exists {
                StoreError::InsufficientStock {
                    product_id: item.product_id,
                    requested: item.quantity,
                }
            } else {
                StoreError::ProductNotFound(item.product_id)
            });
        }

        let line_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO cart (user_id, product_id, quantity) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .fetch_one(&mut *tx)
        .await?;
        line_ids.push(line_id);
    }

    tx.commit().await?;
    Ok(line_ids)
}

/// List a user's cart lines joined with product name and price.
pub async fn list_cart_lines(pool: &PgPool, user_id: i64) -> Result<Vec<CartLineView>, StoreError> {
    let rows = sqlx::query_as::<_, CartLineView>(
        r#"
        SELECT cart.id, products.name AS product_name, products.price AS product_price, cart.quantity
        FROM cart
        JOIN products ON products.id = cart.product_id
        WHERE cart.user_id = $1
        ORDER BY cart.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Remove one line owned by `user_id`. Zero rows is not an error.
pub async fn remove_cart_line(pool: &PgPool, user_id: i64, line_id: i64) -> Result<u64, StoreError> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query_as::<_, (i64, i32)>(
        "DELETE FROM cart WHERE id = $1 AND user_id = $2 RETURNING product_id, quantity",
    )
    .bind(line_id)
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    release_stock(&mut tx, &removed).await?;
    tx.commit().await?;
    Ok(removed.len() as u64)
}

/// Remove every line owned by `user_id`. Zero rows is not an error.
pub async fn clear_cart(pool: &PgPool, user_id: i64) -> Result<u64, StoreError> {
    let mut tx = pool.begin().await?;
    let removed = sqlx::query_as::<_, (i64, i32)>(
        "DELETE FROM cart WHERE user_id = $1 RETURNING product_id, quantity",
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    release_stock(&mut tx, &removed).await?;
    tx.commit().await?;
    Ok(removed.len() as u64)
}

/// Return held quantities to stock.
async fn release_stock(
    tx: &mut Transaction<'_, Postgres>,
    lines: &[(i64, i32)],
) -> Result<(), StoreError> {
    for &(product_id, quantity) in lines {
        sqlx::query("UPDATE products SET stock = stock + $1 WHERE id = $2")
            .bind(quantity)
            .bind(product_id)
            .execute(&mut **tx)
            .await?;
        debug!(product_id, quantity, "released reserved stock");
    }
    Ok(())
}
