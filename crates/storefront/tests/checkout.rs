//! Checkout integration tests against an in-memory database.

#![allow(clippy::unwrap_used)]

mod common;

use bookstall_core::Price;
use bookstall_storefront::services::{CartService, OrderError, OrderService};

use common::{book_by_title, register_user, setup_pool_with_catalog, stock_of};

#[tokio::test]
async fn test_checkout_totals_stock_and_cart() {
    let pool = setup_pool_with_catalog().await;
    let alice = register_user(&pool, "alice").await;

    let carnegie = book_by_title(&pool, "How to Win Friends and Influence People").await;
    let alchemist = book_by_title(&pool, "The Alchemist").await;

    let cart = CartService::new(&pool);
    cart.add(alice.id, carnegie.id, 2).await.unwrap();
    cart.add(alice.id, alchemist.id, 1).await.unwrap();

    let orders = OrderService::new(&pool);
    let order = orders.place_order(alice.id).await.unwrap();

    // 2 x 89000 + 1 x 79000
    assert_eq!(order.total_amount, Price::new(257_000));
    assert_eq!(order.user_id, alice.id);

    // Stock is decremented per line
    assert_eq!(stock_of(&pool, "How to Win Friends and Influence People").await, 48);
    assert_eq!(stock_of(&pool, "The Alchemist").await, 29);

    // Cart is cleared
    assert!(cart.lines(alice.id).await.unwrap().is_empty());

    // One item row per cart line, with quantities preserved
    let (_, items) = orders.find_order(alice.id, order.id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity + items[1].quantity, 3);

    // The order shows up in the history
    let history = orders.history(alice.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, order.id);
}

#[tokio::test]
async fn test_checkout_insufficient_stock_rolls_back() {
    let pool = setup_pool_with_catalog().await;
    let alice = register_user(&pool, "alice").await;

    let sapiens = book_by_title(&pool, "Sapiens").await;
    let alchemist = book_by_title(&pool, "The Alchemist").await;

    // Only 1 copy left
    sqlx::query("UPDATE books SET stock = 1 WHERE id = ?")
        .bind(sapiens.id)
        .execute(&pool)
        .await
        .unwrap();

    let cart = CartService::new(&pool);
    cart.add(alice.id, alchemist.id, 1).await.unwrap();
    cart.add(alice.id, sapiens.id, 2).await.unwrap();

    let orders = OrderService::new(&pool);
    let err = orders.place_order(alice.id).await.unwrap_err();
    assert!(matches!(err, OrderError::InsufficientStock(title) if title == "Sapiens"));

    // Nothing persisted: no orders, stock untouched (including the line
    // processed before the failing one), cart intact
    assert!(orders.history(alice.id).await.unwrap().is_empty());
    assert_eq!(stock_of(&pool, "Sapiens").await, 1);
    assert_eq!(stock_of(&pool, "The Alchemist").await, 30);
    assert_eq!(cart.lines(alice.id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let pool = setup_pool_with_catalog().await;
    let alice = register_user(&pool, "alice").await;

    let err = OrderService::new(&pool)
        .place_order(alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::EmptyCart));
}

#[tokio::test]
async fn test_order_items_snapshot_prices() {
    let pool = setup_pool_with_catalog().await;
    let alice = register_user(&pool, "alice").await;

    let alchemist = book_by_title(&pool, "The Alchemist").await;

    CartService::new(&pool)
        .add(alice.id, alchemist.id, 1)
        .await
        .unwrap();

    let orders = OrderService::new(&pool);
    let order = orders.place_order(alice.id).await.unwrap();

    // A later price change must not rewrite order history
    sqlx::query("UPDATE books SET price = 999000 WHERE id = ?")
        .bind(alchemist.id)
        .execute(&pool)
        .await
        .unwrap();

    let (order, items) = orders.find_order(alice.id, order.id).await.unwrap();
    assert_eq!(items[0].unit_price, Price::new(79_000));
    assert_eq!(order.total_amount, Price::new(79_000));
}

#[tokio::test]
async fn test_find_order_enforces_ownership() {
    let pool = setup_pool_with_catalog().await;
    let alice = register_user(&pool, "alice").await;
    let mallory = register_user(&pool, "mallory").await;

    let alchemist = book_by_title(&pool, "The Alchemist").await;
    CartService::new(&pool)
        .add(alice.id, alchemist.id, 1)
        .await
        .unwrap();

    let orders = OrderService::new(&pool);
    let order = orders.place_order(alice.id).await.unwrap();

    let err = orders.find_order(mallory.id, order.id).await.unwrap_err();
    assert!(matches!(err, OrderError::NotOwner));

    assert!(orders.find_order(alice.id, order.id).await.is_ok());
}
