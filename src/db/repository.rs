//! User repository for Valley.
//!
//! Provides the user lookups the catalog and statistics operations gate on,
//! plus the per-user statistics aggregate.

use chrono::Utc;

use super::user::{NewUser, User};
use super::{parse_datetime, DbPool, SQL_FALSE, SQL_TRUE};
use crate::{Result, ValleyError};

#[cfg(feature = "sqlite")]
const SQL_NOW: &str = "datetime('now')";
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
const SQL_NOW: &str = "NOW()";

/// Database row for a user.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    nickname: String,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            nickname: row.nickname,
            is_active: row.is_active,
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for user lookups and the per-user aggregate.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (nickname, is_active) VALUES ($1, $2) RETURNING id",
        )
        .bind(&new_user.nickname)
        .bind(new_user.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        self.get_by_id(id).await?.ok_or(ValleyError::UserNotFound)
    }

    /// Get a user by ID, regardless of active state.
    ///
    /// Board views resolve the creator's nickname through this lookup, so
    /// a deactivated creator still shows up on their boards.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, nickname, is_active, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(row.map(User::from))
    }

    /// Get a user by ID, filtered to active accounts.
    pub async fn get_active(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT id, nickname, is_active, created_at, updated_at
             FROM users WHERE id = $1 AND is_active = {}",
            SQL_TRUE
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(row.map(User::from))
    }

    /// Set a user's active flag.
    ///
    /// Returns true if the user existed.
    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<bool> {
        let flag = if is_active { SQL_TRUE } else { SQL_FALSE };
        let result = sqlx::query(&format!(
            "UPDATE users SET is_active = {}, updated_at = {} WHERE id = $1",
            flag, SQL_NOW
        ))
        .bind(id)
        .execute(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate per-user statistics: distinct posts, distinct replies, and
    /// distinct clones across all clones owned by the user.
    ///
    /// A single query with DISTINCT counts, so the clone→post and
    /// clone→reply joins cannot multiply each other's counts. The counts
    /// are totals: soft-deleted posts and replies are included.
    pub async fn aggregate_stats(&self, user_id: i64) -> Result<(i64, i64, i64)> {
        let counts: (i64, i64, i64) = sqlx::query_as(&format!(
            "SELECT COUNT(DISTINCT p.id), COUNT(DISTINCT r.id), COUNT(DISTINCT c.id)
             FROM users u
             LEFT JOIN clones c ON c.user_id = u.id
             LEFT JOIN posts p ON p.clone_id = c.id
             LEFT JOIN replies r ON r.clone_id = c.id
             WHERE u.id = $1 AND u.is_active = {}",
            SQL_TRUE
        ))
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(counts)
    }
}
