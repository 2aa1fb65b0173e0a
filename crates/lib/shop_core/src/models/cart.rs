//! Cart models.

use serde::{Deserialize, Serialize};

/// One requested reservation in an add-to-cart batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(alias = "productId")]
    pub product_id: i64,
    pub quantity: i32,
}

/// Cart line joined with its product for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CartLineView {
    pub id: i64,
    pub product_name: String,
    pub product_price: i64,
    pub quantity: i32,
}
