//! Order service: checkout and order history.

use sqlx::SqlitePool;
use thiserror::Error;

use bookstall_core::{OrderId, UserId};

use crate::db::{CartRepository, OrderRepository, RepositoryError};
use crate::models::{Order, OrderLine};

/// Errors that can occur while placing or viewing orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout was attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line asks for more copies than are in stock.
    #[error("insufficient stock for \"{0}\"")]
    InsufficientStock(String),

    /// The referenced order does not exist.
    #[error("order not found")]
    NotFound,

    /// The order belongs to a different user.
    #[error("order belongs to another user")]
    NotOwner,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order service scoped to a database pool.
pub struct OrderService<'a> {
    cart: CartRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            cart: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Convert the user's cart into a persisted order.
    ///
    /// Either every step succeeds (order and items written, stock
    /// decremented, cart cleared) or none take effect.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if there is nothing to check out,
    /// `OrderError::InsufficientStock` naming the book that ran out, and
    /// `OrderError::Repository` for persistence failures (after rollback).
    pub async fn place_order(&self, user_id: UserId) -> Result<Order, OrderError> {
        // Cheap rejection before opening a transaction.
        if self.cart.lines_for_user(user_id).await?.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        self.orders
            .create_from_cart(user_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::EmptyCart,
                RepositoryError::InsufficientStock { title } => {
                    OrderError::InsufficientStock(title)
                }
                other => OrderError::Repository(other),
            })
    }

    /// Fetch one of the user's orders with its lines.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for unknown orders and
    /// `OrderError::NotOwner` if the order belongs to someone else.
    pub async fn find_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<(Order, Vec<OrderLine>), OrderError> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if order.user_id != user_id {
            return Err(OrderError::NotOwner);
        }

        let items = self.orders.items(order_id).await?;

        Ok((order, items))
    }

    /// The user's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }
}
