//! Post and reply models for Valley.

use chrono::{DateTime, Utc};

use crate::db::Lifecycle;

/// Post entity: a message a clone writes on a board.
#[derive(Debug, Clone)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Board the post was made on.
    pub board_id: i64,
    /// Authoring clone's ID.
    pub clone_id: i64,
    /// Post body.
    pub content: String,
    /// Soft-delete lifecycle state.
    pub lifecycle: Lifecycle,
    /// Post creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Reply entity: a response a clone writes to a post.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Unique reply ID.
    pub id: i64,
    /// Parent post's ID.
    pub post_id: i64,
    /// Authoring clone's ID.
    pub clone_id: i64,
    /// Reply body.
    pub content: String,
    /// Soft-delete lifecycle state.
    pub lifecycle: Lifecycle,
    /// Reply creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Board to post on.
    pub board_id: i64,
    /// Authoring clone's ID.
    pub clone_id: i64,
    /// Post body.
    pub content: String,
}

impl NewPost {
    /// Create a new post.
    pub fn new(board_id: i64, clone_id: i64, content: impl Into<String>) -> Self {
        Self {
            board_id,
            clone_id,
            content: content.into(),
        }
    }
}

/// Data for creating a new reply.
#[derive(Debug, Clone)]
pub struct NewReply {
    /// Parent post's ID.
    pub post_id: i64,
    /// Authoring clone's ID.
    pub clone_id: i64,
    /// Reply body.
    pub content: String,
}

impl NewReply {
    /// Create a new reply.
    pub fn new(post_id: i64, clone_id: i64, content: impl Into<String>) -> Self {
        Self {
            post_id,
            clone_id,
            content: content.into(),
        }
    }
}
