//! Order repository, including the transactional checkout.

use chrono::Utc;
use sqlx::SqlitePool;

use bookstall_core::{OrderId, Price, UserId};

use super::RepositoryError;
use crate::models::{CartLine, Order, OrderLine};

const ORDER_COLUMNS: &str = "id, user_id, total_amount, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order, atomically.
    ///
    /// In one transaction: re-reads the cart, computes the total, inserts
    /// the order and its items with snapshotted prices, decrements each
    /// book's stock with a floor check, and clears the cart. Any failure
    /// rolls the whole thing back and leaves the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart is empty.
    /// Returns `RepositoryError::InsufficientStock` if any line asks for
    /// more copies than are left.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_from_cart(&self, user_id: UserId) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Re-read the cart inside the transaction so the totals and the
        // stock checks see one consistent snapshot.
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
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(RepositoryError::NotFound);
        }

        let total: Price = lines.iter().map(CartLine::line_total).sum();

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders (user_id, total_amount, created_at)
            VALUES (?, ?, ?)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(total)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            // Conditional decrement: zero rows affected means the floor
            // would be crossed, which aborts the whole checkout.
            let decremented =
                sqlx::query("UPDATE books SET stock = stock - ? WHERE id = ? AND stock >= ?")
                    .bind(line.quantity)
                    .bind(line.book_id)
                    .bind(line.quantity)
                    .execute(&mut *tx)
                    .await?;

            if decremented.rows_affected() == 0 {
                return Err(RepositoryError::InsufficientStock {
                    title: line.title.clone(),
                });
            }

            sqlx::query(
                r"
                INSERT INTO order_items (order_id, book_id, quantity, unit_price)
                VALUES (?, ?, ?, ?)
                ",
            )
            .bind(order.id)
            .bind(line.book_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// Get an order by its ID, regardless of owner.
    ///
    /// Callers are responsible for the ownership check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// The items of an order, joined with book titles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderLine>(
            r"
            SELECT oi.id, oi.book_id, b.title, oi.quantity, oi.unit_price
            FROM order_items oi
            JOIN books b ON b.id = oi.book_id
            WHERE oi.order_id = ?
            ORDER BY oi.id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// All orders of a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r"
            SELECT {ORDER_COLUMNS} FROM orders
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }
}
