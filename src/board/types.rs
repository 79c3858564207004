//! Board model and view types for Valley.
//!
//! This module defines the Board entity plus the composed views the catalog
//! returns: `BoardInfo` (board + creator nickname + statistics) and
//! `BoardSummary` (board + subscription identity, for per-clone listings).

use chrono::{DateTime, Utc};

use crate::db::Lifecycle;

/// Board entity representing a discussion board.
#[derive(Debug, Clone)]
pub struct Board {
    /// Unique board ID.
    pub id: i64,
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
    /// ID of the user who created the board.
    pub created_by: i64,
    /// Soft-delete lifecycle state.
    pub lifecycle: Lifecycle,
    /// Board creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Check whether the board is live (not soft-deleted).
    pub fn is_live(&self) -> bool {
        self.lifecycle.is_live()
    }
}

/// Data for creating a new board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    /// ID of the creating user.
    pub created_by: i64,
    /// Board name.
    pub name: String,
    /// Board description (defaults to empty).
    pub description: String,
}

impl NewBoard {
    /// Create a new board with minimal required fields.
    pub fn new(created_by: i64, name: impl Into<String>) -> Self {
        Self {
            created_by,
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A board composed with its creator's nickname and live statistics.
#[derive(Debug, Clone)]
pub struct BoardInfo {
    /// Board ID.
    pub id: i64,
    /// Board name.
    pub name: String,
    /// Nickname of the creating user.
    pub creator_nickname: String,
    /// Board description.
    pub description: String,
    /// Number of distinct clones with an active subscription.
    pub subscriber_count: i64,
    /// Number of live posts on the board.
    pub post_count: i64,
    /// Number of live replies to live posts on the board.
    pub reply_count: i64,
    /// Board creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A board a clone actively subscribes to, paired with the subscription's
/// own identity so the caller can target an unsubscribe at it.
#[derive(Debug, Clone)]
pub struct BoardSummary {
    /// Board ID.
    pub board_id: i64,
    /// ID of the clone's subscription to this board.
    pub subscription_id: i64,
    /// Board name.
    pub name: String,
    /// Board description.
    pub description: String,
    /// Nickname of the creating user.
    pub creator_nickname: String,
    /// Board creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
