//! Product catalog persistence.

use sqlx::PgPool;

use crate::models::catalog::{NewProduct, Product, ProductPatch, ProductSummary};
use crate::store::StoreError;

/// List every product (summary columns only), ordered by id.
pub async fn list_products(pool: &PgPool) -> Result<Vec<ProductSummary>, StoreError> {
    let rows = sqlx::query_as::<_, ProductSummary>(
        "SELECT id, name, price, image FROM products ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch one product.
pub async fn get_product(pool: &PgPool, product_id: i64) -> Result<Option<Product>, StoreError> {
    let row = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price, stock, image FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a batch of products in one transaction.
pub async fn insert_products(
    pool: &PgPool,
    products: &[NewProduct],
) -> Result<Vec<i64>, StoreError> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(products.len());

    for product in products {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO products (name, description, price, stock, image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.image)
        .fetch_one(&mut *tx)
        .await?;
        ids.push(id);
    }

    tx.commit().await?;
    Ok(ids)
}

/// Apply a partial update. Returns `false` if no such product.
pub async fn update_product(
    pool: &PgPool,
    product_id: i64,
    patch: &ProductPatch,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET name = COALESCE($1, name),
            description = COALESCE($2, description),
            price = COALESCE($3, price),
            stock = COALESCE($4, stock),
            image = COALESCE($5, image)
        WHERE id = $6
        "#,
    )
    .bind(patch.name.as_deref())
    .bind(patch.description.as_deref())
    .bind(patch.price)
    .bind(patch.stock)
    .bind(patch.image.as_deref())
    .bind(product_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a product (cart lines cascade). Returns `false` if no such product.
pub async fn delete_product(pool: &PgPool, product_id: i64) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
