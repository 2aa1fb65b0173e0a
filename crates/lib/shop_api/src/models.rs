//! Request and response bodies.
//!
//! Field names follow the storefront client (snake_case); camelCase aliases
//! are accepted on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shop_core::models::order::{Order, OrderStatus};

/// Error body returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "usernameOrEmail", alias = "nameoremail")]
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Body of `POST /cart/remove`.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLineRef {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(alias = "totalPrice")]
    pub total_price: i64,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: i64,
    pub status: String,
}

/// Order as shown to its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i64,
    pub status: OrderStatus,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderView {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            status: o.status,
            total_price: o.total_price,
            created_at: o.created_at,
        }
    }
}

/// Order as shown to admins, with its owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrderView {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for AdminOrderView {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            status: o.status,
            total_price: o.total_price,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsCreatedResponse {
    pub message: String,
    pub ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_accepts_legacy_and_camel_case_field_names() {
        for body in [
            r#"{"nameoremail":"alice","password":"pw1"}"#,
            r#"{"usernameOrEmail":"alice","password":"pw1"}"#,
            r#"{"username_or_email":"alice","password":"pw1"}"#,
        ] {
            let req: LoginRequest = serde_json::from_str(body).unwrap();
            assert_eq!(req.username_or_email, "alice");
        }
    }

    #[test]
    fn order_request_fields_are_optional_except_price() {
        let req: CreateOrderRequest = serde_json::from_str(r#"{"total_price":30}"#).unwrap();
        assert_eq!(req.total_price, 30);
        assert!(req.status.is_none());
        assert!(req.created_at.is_none());

        let req: CreateOrderRequest = serde_json::from_str(
            r#"{"status":"pending","totalPrice":5,"createdAt":"2026-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(req.status.as_deref(), Some("pending"));
        assert!(req.created_at.is_some());
    }
}
