//! Database operations for the storefront `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Account credentials (username, email, Argon2id hash)
//! - `books` - The catalog, including price and stock
//! - `cart_items` - Pending quantities, one row per (user, book)
//! - `orders` / `order_items` - Immutable purchase records
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into
//! the binary via [`MIGRATOR`]; they run automatically on startup.

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub mod books;
pub mod cart;
pub mod orders;
pub mod users;

pub use books::{BookFilter, BookRepository};
pub use cart::{CartRepository, MAX_QUANTITY};
pub use orders::OrderRepository;
pub use users::UserRepository;

/// Embedded migrations from `crates/storefront/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A stock decrement would take a book below zero.
    #[error("insufficient stock for \"{title}\"")]
    InsufficientStock {
        /// Title of the book that ran out.
        title: String,
    },
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if it does not exist yet.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot
/// be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}
