/// Order and order item models
///
/// # Schema
///
/// ```sql
/// CREATE TABLE orders (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL,
///     total_price NUMERIC(14, 2) NOT NULL DEFAULT 0,
///     status VARCHAR(20) NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE order_items (
///     id BIGSERIAL PRIMARY KEY,
///     order_id BIGINT NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
///     product_id BIGINT NOT NULL,
///     quantity INTEGER NOT NULL CHECK (quantity > 0),
///     price NUMERIC(12, 2) NOT NULL CHECK (price >= 0)
/// );
/// ```
///
/// Item prices are captured when the order is created and never rewritten, so
/// later catalog price changes do not alter historical orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest value the `NUMERIC(14, 2)` total column holds: 999999999999.99
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(0x107A_3FFF, 0x5AF3, 0, false, 2);

/// Order lifecycle state
///
/// Orders start as `Pending`; `Completed` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Canceled,
}

impl OrderStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
        }
    }

    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Canceled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown order status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "canceled" => Ok(OrderStatus::Canceled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Order with its line items
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,

    /// Line items, in insertion order
    #[serde(rename = "products")]
    pub items: Vec<OrderItem>,

    /// Sum of quantity × unit price over all items
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,

    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single order line
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,

    /// Unit price at the time the order was placed
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Input for inserting an order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub items: Vec<NewOrderItem>,
    pub total_price: Decimal,
    pub status: OrderStatus,
}

/// Input for a single order line
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i32,
    pub price: Decimal,
}

impl NewOrderItem {
    /// Quantity × unit price, `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

impl NewOrder {
    /// Builds a pending order whose total is the sum of its line totals
    ///
    /// Returns `None` if the total overflows or does not fit [`MAX_ORDER_TOTAL`].
    pub fn pending(user_id: i64, items: Vec<NewOrderItem>) -> Option<Self> {
        let total_price = items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total()?))
            .filter(|total| *total <= MAX_ORDER_TOTAL)?;

        Some(Self {
            user_id,
            items,
            total_price,
            status: OrderStatus::Pending,
        })
    }
}
