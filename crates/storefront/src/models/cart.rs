//! Cart models.

use serde::{Deserialize, Serialize};

use bookstall_core::{BookId, CartItemId, Price, UserId};

/// A raw cart row: one pending quantity of one book for one user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub book_id: BookId,
    pub quantity: i64,
}

/// A cart row joined with its book, as shown on the cart page.
///
/// The join is done in SQL so rendering the cart never goes back to the
/// database per line.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLine {
    pub id: CartItemId,
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub unit_price: Price,
    pub quantity: i64,
}

impl CartLine {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.unit_price.line_total(self.quantity)
    }
}

/// Sum the line totals of a cart.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}
