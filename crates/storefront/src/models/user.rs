//! User models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bookstall_core::{Email, UserId};

/// A registered storefront user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// The authenticated user as stored in the session.
///
/// Only the fields needed on every request are kept here; anything else
/// is loaded from the database on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub username: String,
}

impl CurrentUser {
    /// Create session data for a freshly authenticated user.
    #[must_use]
    pub fn new(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
        }
    }
}
