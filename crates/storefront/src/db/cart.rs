//! Cart repository.
//!
//! One row per (user, book); adding the same book again folds into the
//! existing row via an upsert.

use sqlx::SqlitePool;

use bookstall_core::{BookId, CartItemId, UserId};

use super::RepositoryError;
use crate::models::{CartItem, CartLine};

/// Maximum copies of one book in a single cart line.
///
/// Keeps quantities in a range where line totals can never overflow the
/// integer price arithmetic. Enforced here and by the table CHECK.
pub const MAX_QUANTITY: i64 = 99;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add `quantity` of a book to the user's cart.
    ///
    /// If the (user, book) pair already has a row, its quantity is
    /// incremented; otherwise a new row is inserted. The merged quantity
    /// is clamped to [`MAX_QUANTITY`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add(
        &self,
        user_id: UserId,
        book_id: BookId,
        quantity: i64,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (user_id, book_id, quantity)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, book_id)
            DO UPDATE SET quantity = MIN(quantity + excluded.quantity, ?)
            ",
        )
        .bind(user_id)
        .bind(book_id)
        .bind(quantity)
        .bind(MAX_QUANTITY)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Get a cart item by its ID, regardless of owner.
    ///
    /// Callers are responsible for the ownership check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            "SELECT id, user_id, book_id, quantity FROM cart_items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// All cart lines for a user, joined with the book columns needed for
    /// display and totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r"
            SELECT ci.id, ci.book_id, b.title, b.author, b.image_url,
                   b.price AS unit_price, ci.quantity
            FROM cart_items ci
            JOIN books b ON b.id = ci.book_id
            WHERE ci.user_id = ?
            ORDER BY ci.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Set a cart item's quantity. The quantity must be positive; use
    /// [`delete`](Self::delete) to drop a line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        id: CartItemId,
        quantity: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cart_items SET quantity = ? WHERE id = ?")
            .bind(quantity)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a cart item by its ID.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
