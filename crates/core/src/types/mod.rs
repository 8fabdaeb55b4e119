//! Newtype wrappers for domain values.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{BookId, CartItemId, OrderId, OrderItemId, UserId};
pub use price::Price;
