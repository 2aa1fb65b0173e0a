//! Order models and the order status workflow.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of order states.
///
/// Declaration order is the fulfilment order. An order only moves forward
/// (skipping steps is allowed); `Canceled` is reachable from `Pending` and
/// `Processing` only; `Completed` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipping,
    Shipped,
    Completed,
    #[serde(alias = "cancelled")]
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipping,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipping => "shipping",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }

    /// Whether an admin may move an order from `self` to `next`.
    ///
    /// Re-applying the current status is allowed and changes nothing.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match next {
            OrderStatus::Canceled => {
                matches!(self, OrderStatus::Pending | OrderStatus::Processing)
            }
            _ => next > *self,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of [`OrderStatus::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipping" => Ok(OrderStatus::Shipping),
            "shipped" => Ok(OrderStatus::Shipped),
            "completed" => Ok(OrderStatus::Completed),
            "canceled" | "cancelled" => Ok(OrderStatus::Canceled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}

/// Validated order snapshot ready to persist.
///
/// `total_price` and `created_at` come from the client as-is; they are not
/// recomputed from cart contents or the server clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub status: OrderStatus,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
}
