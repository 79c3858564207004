//! Post and reply repositories for Valley.
//!
//! Posts and replies exist here for what the statistics count: creation,
//! soft deletion, and the live-count queries. Content editing and listing
//! belong to other services.

use chrono::Utc;

use super::types::{NewPost, NewReply, Post, Reply};
use crate::db::{parse_datetime, DbPool, Lifecycle};
use crate::{Result, ValleyError};

/// Repository for post persistence.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post.
    ///
    /// Returns the created post with the assigned ID.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (board_id, clone_id, content)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_post.board_id)
        .bind(new_post.clone_id)
        .bind(&new_post.content)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ValleyError::Storage("created post vanished".to_string()))
    }

    /// Get a post by ID, regardless of lifecycle state.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row: Option<PostRow> = sqlx::query_as(
            "SELECT id, board_id, clone_id, content, lifecycle, created_at
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(row.map(|r| r.into_post()))
    }

    /// Soft-delete a post.
    ///
    /// Returns true if a live post was deleted. Replies to the post are
    /// untouched; they drop out of live counts through the join instead.
    pub async fn soft_delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE posts SET lifecycle = $1 WHERE id = $2 AND lifecycle = $3",
        )
        .bind(Lifecycle::Deleted.as_str())
        .bind(id)
        .bind(Lifecycle::Live.as_str())
        .execute(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count live posts on a board.
    pub async fn count_live_by_board(&self, board_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts WHERE board_id = $1 AND lifecycle = $2",
        )
        .bind(board_id)
        .bind(Lifecycle::Live.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(count.0)
    }
}

/// Repository for reply persistence.
pub struct ReplyRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ReplyRepository<'a> {
    /// Create a new ReplyRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new reply.
    ///
    /// Returns the created reply with the assigned ID.
    pub async fn create(&self, new_reply: &NewReply) -> Result<Reply> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO replies (post_id, clone_id, content)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_reply.post_id)
        .bind(new_reply.clone_id)
        .bind(&new_reply.content)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ValleyError::Storage("created reply vanished".to_string()))
    }

    /// Get a reply by ID, regardless of lifecycle state.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Reply>> {
        let row: Option<ReplyRow> = sqlx::query_as(
            "SELECT id, post_id, clone_id, content, lifecycle, created_at
             FROM replies WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(row.map(|r| r.into_reply()))
    }

    /// Soft-delete a reply.
    ///
    /// Returns true if a live reply was deleted.
    pub async fn soft_delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE replies SET lifecycle = $1 WHERE id = $2 AND lifecycle = $3",
        )
        .bind(Lifecycle::Deleted.as_str())
        .bind(id)
        .bind(Lifecycle::Live.as_str())
        .execute(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count live replies on a board.
    ///
    /// A reply counts only while both it and its parent post are live, so
    /// soft-deleting a post removes its replies from the count transitively
    /// even though the reply rows keep their own live state.
    pub async fn count_live_by_board(&self, board_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM replies r
             INNER JOIN posts p ON p.id = r.post_id
             WHERE p.board_id = $1 AND p.lifecycle = $2 AND r.lifecycle = $2",
        )
        .bind(board_id)
        .bind(Lifecycle::Live.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(count.0)
    }
}

/// Internal struct for mapping database rows to Post.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    board_id: i64,
    clone_id: i64,
    content: String,
    lifecycle: String,
    created_at: String,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            id: self.id,
            board_id: self.board_id,
            clone_id: self.clone_id,
            content: self.content,
            lifecycle: self.lifecycle.parse().unwrap_or(Lifecycle::Live),
            created_at: parse_datetime(&self.created_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Internal struct for mapping database rows to Reply.
#[derive(sqlx::FromRow)]
struct ReplyRow {
    id: i64,
    post_id: i64,
    clone_id: i64,
    content: String,
    lifecycle: String,
    created_at: String,
}

impl ReplyRow {
    fn into_reply(self) -> Reply {
        Reply {
            id: self.id,
            post_id: self.post_id,
            clone_id: self.clone_id,
            content: self.content,
            lifecycle: self.lifecycle.parse().unwrap_or(Lifecycle::Live),
            created_at: parse_datetime(&self.created_at).unwrap_or_else(Utc::now),
        }
    }
}
