//! Shared helpers for storefront integration tests.

#![allow(dead_code)]

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use bookstall_storefront::db::{BookFilter, BookRepository, MIGRATOR};
use bookstall_storefront::models::{Book, User};
use bookstall_storefront::services::AuthService;

/// Create a migrated in-memory database.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect to in-memory database");

    MIGRATOR.run(&pool).await.expect("run migrations");

    pool
}

/// Create a migrated in-memory database with the sample catalog loaded.
pub async fn setup_pool_with_catalog() -> SqlitePool {
    let pool = setup_pool().await;

    let seeded = BookRepository::new(&pool)
        .seed_if_empty()
        .await
        .expect("seed catalog");
    assert!(seeded);

    pool
}

/// Register a user through the auth service.
pub async fn register_user(pool: &SqlitePool, username: &str) -> User {
    AuthService::new(pool)
        .register(username, &format!("{username}@example.com"), "p1")
        .await
        .expect("register user")
}

/// Look up a seeded book by title.
pub async fn book_by_title(pool: &SqlitePool, title: &str) -> Book {
    let filter = BookFilter {
        category: None,
        search: Some(title.to_owned()),
    };

    BookRepository::new(pool)
        .list(&filter)
        .await
        .expect("list books")
        .into_iter()
        .find(|b| b.title == title)
        .expect("book not seeded")
}

/// Current stock for a book.
pub async fn stock_of(pool: &SqlitePool, title: &str) -> i64 {
    book_by_title(pool, title).await.stock
}
