//! Application services.
//!
//! Services wrap the repositories with domain rules and typed errors so
//! route handlers stay thin.

pub mod auth;
pub mod cart;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use orders::{OrderError, OrderService};
