//! Cart service.
//!
//! Wraps the cart repository with the ownership and quantity rules: every
//! mutation is checked against the requesting user, and setting a quantity
//! to zero or below deletes the line instead.

use sqlx::SqlitePool;
use thiserror::Error;

use bookstall_core::{BookId, CartItemId, UserId};

use crate::db::{BookRepository, CartRepository, MAX_QUANTITY, RepositoryError};
use crate::models::{Book, CartItem, CartLine};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The referenced book does not exist.
    #[error("book not found")]
    BookNotFound,

    /// The referenced cart item does not exist.
    #[error("cart item not found")]
    ItemNotFound,

    /// The cart item belongs to a different user.
    #[error("cart item belongs to another user")]
    NotOwner,

    /// Quantity outside `1..=MAX_QUANTITY`.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service scoped to a database pool.
pub struct CartService<'a> {
    books: BookRepository<'a>,
    cart: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            books: BookRepository::new(pool),
            cart: CartRepository::new(pool),
        }
    }

    /// Add `quantity` of a book to the user's cart, folding into an
    /// existing line if there is one. Returns the book for messaging.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for quantities outside
    /// `1..=MAX_QUANTITY` and `CartError::BookNotFound` for unknown books.
    pub async fn add(
        &self,
        user_id: UserId,
        book_id: BookId,
        quantity: i64,
    ) -> Result<Book, CartError> {
        if !(1..=MAX_QUANTITY).contains(&quantity) {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let book = self.books.get(book_id).await?.ok_or(CartError::BookNotFound)?;

        self.cart.add(user_id, book_id, quantity).await?;

        Ok(book)
    }

    /// The user's cart lines, joined with book data.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn lines(&self, user_id: UserId) -> Result<Vec<CartLine>, CartError> {
        Ok(self.cart.lines_for_user(user_id).await?)
    }

    /// Set a cart item's quantity. Zero or negative deletes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for quantities above
    /// `MAX_QUANTITY`, `CartError::ItemNotFound` for unknown items and
    /// `CartError::NotOwner` if the item belongs to someone else.
    pub async fn update(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i64,
    ) -> Result<(), CartError> {
        if quantity > MAX_QUANTITY {
            return Err(CartError::InvalidQuantity(quantity));
        }

        self.owned_item(user_id, item_id).await?;

        if quantity > 0 {
            self.cart.set_quantity(item_id, quantity).await?;
        } else {
            self.cart.delete(item_id).await?;
        }

        Ok(())
    }

    /// Remove a cart item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` for unknown items and
    /// `CartError::NotOwner` if the item belongs to someone else.
    pub async fn remove(&self, user_id: UserId, item_id: CartItemId) -> Result<(), CartError> {
        self.owned_item(user_id, item_id).await?;
        self.cart.delete(item_id).await?;
        Ok(())
    }

    /// Fetch an item and verify it belongs to `user_id`.
    async fn owned_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<CartItem, CartError> {
        let item = self
            .cart
            .get(item_id)
            .await?
            .ok_or(CartError::ItemNotFound)?;

        if item.user_id != user_id {
            return Err(CartError::NotOwner);
        }

        Ok(item)
    }
}
