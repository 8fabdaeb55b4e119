//! Catalog models.

use serde::{Deserialize, Serialize};

use bookstall_core::{BookId, Price};

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Unit price in the smallest currency unit.
    pub price: Price,
    /// Copies available for purchase. Decremented at checkout.
    pub stock: i64,
    pub category: String,
    pub image_url: String,
}

impl Book {
    /// Whether any copies are left to sell.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
