//! Domain models for the storefront.

pub mod book;
pub mod cart;
pub mod order;
pub mod user;

pub use book::Book;
pub use cart::{CartItem, CartLine, cart_total};
pub use order::{Order, OrderLine};
pub use user::{CurrentUser, User};

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The logged-in user ([`super::CurrentUser`]).
    pub const CURRENT_USER: &str = "current_user";
}
