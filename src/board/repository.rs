//! Board repository for Valley.
//!
//! Provides board persistence plus the lifecycle-filtered lookups the
//! catalog builds its views from.

use chrono::Utc;

use super::types::{Board, NewBoard};
use crate::db::{parse_datetime, DbPool, Lifecycle};
use crate::subscription::SubscriptionState;
use crate::{Result, ValleyError};

#[cfg(feature = "sqlite")]
const SQL_NOW: &str = "datetime('now')";
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
const SQL_NOW: &str = "NOW()";

/// Repository for board persistence.
pub struct BoardRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new board.
    ///
    /// Returns the created board with the assigned ID.
    pub async fn create(&self, new_board: &NewBoard) -> Result<Board> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO boards (name, description, created_by)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&new_board.name)
        .bind(&new_board.description)
        .bind(new_board.created_by)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        self.get_by_id(id).await?.ok_or(ValleyError::BoardNotFound)
    }

    /// Get a board by ID, regardless of lifecycle state.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Board>> {
        let result: Option<BoardRow> = sqlx::query_as(
            "SELECT id, name, description, created_by, lifecycle, created_at, updated_at
             FROM boards WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(result.map(|row| row.into_board()))
    }

    /// Get a live (non-deleted) board by ID.
    pub async fn get_live(&self, id: i64) -> Result<Option<Board>> {
        let result: Option<BoardRow> = sqlx::query_as(
            "SELECT id, name, description, created_by, lifecycle, created_at, updated_at
             FROM boards WHERE id = $1 AND lifecycle = $2",
        )
        .bind(id)
        .bind(Lifecycle::Live.as_str())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(result.map(|row| row.into_board()))
    }

    /// List all live boards, in creation order.
    pub async fn list_live(&self) -> Result<Vec<Board>> {
        let rows: Vec<BoardRow> = sqlx::query_as(
            "SELECT id, name, description, created_by, lifecycle, created_at, updated_at
             FROM boards WHERE lifecycle = $1 ORDER BY id ASC",
        )
        .bind(Lifecycle::Live.as_str())
        .fetch_all(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.into_board()).collect())
    }

    /// List live boards where at least one of the user's clones holds an
    /// active subscription, deduplicated by board, in creation order.
    pub async fn list_subscribed_by_user(&self, user_id: i64) -> Result<Vec<Board>> {
        let rows: Vec<BoardRow> = sqlx::query_as(
            "SELECT DISTINCT b.id, b.name, b.description, b.created_by, b.lifecycle,
                    b.created_at, b.updated_at
             FROM boards b
             JOIN subscriptions s ON s.board_id = b.id
             JOIN clones c ON c.id = s.clone_id
             WHERE c.user_id = $1 AND s.state = $2 AND b.lifecycle = $3
             ORDER BY b.id ASC",
        )
        .bind(user_id)
        .bind(SubscriptionState::Active.as_str())
        .bind(Lifecycle::Live.as_str())
        .fetch_all(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(rows.into_iter().map(|row| row.into_board()).collect())
    }

    /// Soft-delete a board by flipping its lifecycle to deleted.
    ///
    /// Returns true if a live board was deleted, false if the board was
    /// missing or already deleted. The row itself is never removed.
    pub async fn soft_delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(&format!(
            "UPDATE boards SET lifecycle = $1, updated_at = {} WHERE id = $2 AND lifecycle = $3",
            SQL_NOW
        ))
        .bind(Lifecycle::Deleted.as_str())
        .bind(id)
        .bind(Lifecycle::Live.as_str())
        .execute(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all boards, regardless of lifecycle.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM boards")
            .fetch_one(self.pool)
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;
        Ok(count.0)
    }
}

/// Internal struct for mapping database rows to Board.
#[derive(sqlx::FromRow)]
struct BoardRow {
    id: i64,
    name: String,
    description: String,
    created_by: i64,
    lifecycle: String,
    created_at: String,
    updated_at: String,
}

impl BoardRow {
    fn into_board(self) -> Board {
        Board {
            id: self.id,
            name: self.name,
            description: self.description,
            created_by: self.created_by,
            lifecycle: self.lifecycle.parse().unwrap_or(Lifecycle::Live),
            created_at: parse_datetime(&self.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&self.updated_at).unwrap_or_else(Utc::now),
        }
    }
}
