//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured books)
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /books                  - Book listing (?category=, ?search=)
//! GET  /book/{id}              - Book detail
//!
//! # Auth
//! GET  /register               - Registration page
//! POST /register               - Registration action
//! GET  /login                  - Login page (?next= return path)
//! POST /login                  - Login action
//! GET  /logout                 - Logout action
//!
//! # Cart (requires auth)
//! GET  /cart                   - Cart page
//! POST /add_to_cart/{id}       - Add a book to the cart
//! POST /update_cart/{id}       - Update a cart line's quantity
//! GET  /remove_from_cart/{id}  - Remove a cart line
//!
//! # Orders (requires auth)
//! POST /checkout               - Place an order from the cart
//! GET  /order_success/{id}     - Order confirmation
//! GET  /my_orders              - Order history
//! ```

pub mod auth;
pub mod books;
pub mod cart;
pub mod home;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for error/success display.
///
/// Redirects carry short message codes; [`flash_messages`] turns them into
/// user-facing text at render time so URLs never contain free-form strings.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Resolve message codes from a redirect into display text.
#[must_use]
pub fn flash_messages(query: &MessageQuery) -> (Option<String>, Option<String>) {
    (
        query.error.as_deref().map(error_text),
        query.success.as_deref().map(success_text),
    )
}

fn error_text(code: &str) -> String {
    match code {
        "credentials" => "Invalid username or password.",
        "username_taken" => "That username is already taken.",
        "email_taken" => "That email address is already registered.",
        "invalid_username" => "Please enter a valid username.",
        "invalid_email" => "Please enter a valid email address.",
        "weak_password" => "Please enter a password.",
        "invalid_quantity" => "Quantity must be between 1 and 99.",
        "empty_cart" => "Your cart is empty.",
        "out_of_stock" => "One of the books in your cart is out of stock.",
        "checkout_failed" => "Checkout could not be completed. Please try again.",
        "forbidden" => "You don't have access to that page.",
        "session" => "Something went wrong with your session. Please log in again.",
        _ => "Something went wrong. Please try again.",
    }
    .to_owned()
}

fn success_text(code: &str) -> String {
    match code {
        "registered" => "Account created. Please log in.",
        "logged_out" => "You have been logged out.",
        "added" => "Added to cart.",
        "updated" => "Cart updated.",
        "removed" => "Removed from cart.",
        _ => "Done.",
    }
    .to_owned()
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .route("/books", get(books::index))
        .route("/book/{id}", get(books::show))
        // Auth
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        // Cart
        .route("/cart", get(cart::show))
        .route("/add_to_cart/{id}", post(cart::add))
        .route("/update_cart/{id}", post(cart::update))
        .route("/remove_from_cart/{id}", get(cart::remove))
        // Orders
        .route("/checkout", post(orders::checkout))
        .route("/order_success/{id}", get(orders::success))
        .route("/my_orders", get(orders::my_orders))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text_known_codes() {
        assert_eq!(error_text("credentials"), "Invalid username or password.");
        assert_eq!(error_text("empty_cart"), "Your cart is empty.");
    }

    #[test]
    fn test_error_text_unknown_code_is_generic() {
        assert_eq!(
            error_text("no_such_code"),
            "Something went wrong. Please try again."
        );
    }

    #[test]
    fn test_flash_messages() {
        let query = MessageQuery {
            error: None,
            success: Some("registered".to_owned()),
        };
        let (error, success) = flash_messages(&query);
        assert!(error.is_none());
        assert_eq!(success.as_deref(), Some("Account created. Please log in."));
    }
}
