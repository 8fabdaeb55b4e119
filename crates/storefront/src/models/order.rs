//! Order models.
//!
//! Orders are immutable once created; item prices are snapshotted at
//! checkout and do not follow later catalog changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookstall_core::{BookId, OrderId, OrderItemId, Price, UserId};

/// A completed purchase.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Price,
    pub created_at: DateTime<Utc>,
}

/// An order item joined with its book title, as shown on order pages.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderLine {
    pub id: OrderItemId,
    pub book_id: BookId,
    pub title: String,
    pub quantity: i64,
    /// Unit price at the time of purchase.
    pub unit_price: Price,
}

impl OrderLine {
    /// Price of this line: snapshotted unit price times quantity.
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.unit_price.line_total(self.quantity)
    }
}
