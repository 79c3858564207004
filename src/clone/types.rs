//! Clone model for Valley.
//!
//! A clone is an actor identity owned by exactly one user. Posts, replies,
//! and board subscriptions are attributed to a clone, never to the user
//! directly.

use chrono::{DateTime, Utc};

/// Clone entity.
#[derive(Debug, Clone)]
pub struct Clone {
    /// Unique clone ID.
    pub id: i64,
    /// Owning user's ID.
    pub user_id: i64,
    /// Clone name.
    pub name: String,
    /// Clone creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new clone.
#[derive(Debug, Clone)]
pub struct NewClone {
    /// Owning user's ID.
    pub user_id: i64,
    /// Clone name.
    pub name: String,
}

impl NewClone {
    /// Create a new clone for the given user.
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}
