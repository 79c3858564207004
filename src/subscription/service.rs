//! Subscription service for Valley.
//!
//! This module provides the subscribe/unsubscribe operations with the
//! at-most-one-record guarantee for each (clone, board) pair. Both
//! operations run as a single transaction; dropping the transaction on
//! an early error return rolls back any partial work.

use tracing::info;

use super::repository::SubscriptionRepository;
use super::types::{Subscription, SubscriptionState};
use crate::db::{Database, Lifecycle};
use crate::{Result, ValleyError};

// SQL datetime function for current timestamp
#[cfg(feature = "sqlite")]
const SQL_NOW: &str = "datetime('now')";
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
const SQL_NOW: &str = "NOW()";

/// Service for subscription state transitions.
pub struct SubscriptionService<'a> {
    db: &'a Database,
}

impl<'a> SubscriptionService<'a> {
    /// Create a new SubscriptionService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Subscribe a clone to a board.
    ///
    /// Looks up the pair's record regardless of state. An active record
    /// fails with `AlreadyActive`; an inactive record is reactivated in
    /// place; a missing record is created after verifying the clone exists
    /// and the board is live. The whole sequence is one transaction, and a
    /// unique-index conflict on insert is treated as "the record appeared
    /// concurrently" and resolved by re-reading, never surfaced as an error.
    pub async fn subscribe(&self, clone_id: i64, board_id: i64) -> Result<Subscription> {
        let mut tx = self.db.begin().await?;

        // Look up the pair's record in either state.
        let existing: Option<(i64, String)> = sqlx::query_as(
            "SELECT id, state FROM subscriptions WHERE clone_id = $1 AND board_id = $2",
        )
        .bind(clone_id)
        .bind(board_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        let subscription_id = match existing {
            Some((id, state)) => {
                if parse_state(&state).is_active() {
                    // Dropping the transaction rolls it back.
                    return Err(ValleyError::AlreadyActive);
                }
                reactivate(&mut tx, id).await?;
                info!(subscription_id = id, clone_id, board_id, "Subscription reactivated");
                id
            }
            None => {
                // First-time pair: verify both referents before creating.
                let clone_exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM clones WHERE id = $1)")
                        .bind(clone_id)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(|e| ValleyError::Storage(e.to_string()))?;
                if !clone_exists {
                    return Err(ValleyError::CloneNotFound);
                }

                let board_live: bool = sqlx::query_scalar(
                    "SELECT EXISTS(SELECT 1 FROM boards WHERE id = $1 AND lifecycle = $2)",
                )
                .bind(board_id)
                .bind(Lifecycle::Live.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| ValleyError::Storage(e.to_string()))?;
                if !board_live {
                    return Err(ValleyError::BoardNotFound);
                }

                let inserted: Option<(i64,)> = sqlx::query_as(
                    r#"
                    INSERT INTO subscriptions (clone_id, board_id, state)
                    VALUES ($1, $2, 'active')
                    ON CONFLICT (clone_id, board_id) DO NOTHING
                    RETURNING id
                    "#,
                )
                .bind(clone_id)
                .bind(board_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| ValleyError::Storage(e.to_string()))?;

                match inserted {
                    Some((id,)) => {
                        info!(subscription_id = id, clone_id, board_id, "Subscription created");
                        id
                    }
                    None => {
                        // A concurrent subscribe won the insert race between our
                        // lookup and the insert. Re-read its row and resolve as
                        // if the lookup had seen it.
                        let (id, state): (i64, String) = sqlx::query_as(
                            "SELECT id, state FROM subscriptions WHERE clone_id = $1 AND board_id = $2",
                        )
                        .bind(clone_id)
                        .bind(board_id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|e| ValleyError::Storage(e.to_string()))?
                        .ok_or_else(|| {
                            ValleyError::Storage(
                                "subscription row missing after insert conflict".to_string(),
                            )
                        })?;

                        if parse_state(&state).is_active() {
                            return Err(ValleyError::AlreadyActive);
                        }
                        reactivate(&mut tx, id).await?;
                        info!(
                            subscription_id = id,
                            clone_id, board_id, "Subscription reactivated after insert conflict"
                        );
                        id
                    }
                }
            }
        };

        tx.commit()
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;

        let repo = SubscriptionRepository::new(self.db.pool());
        repo.get_by_id(subscription_id)
            .await?
            .ok_or(ValleyError::SubscriptionNotFound)
    }

    /// Unsubscribe a clone from a board.
    ///
    /// Fails with `SubscriptionNotFound` when the pair has no record at all.
    /// An existing record is marked inactive regardless of its current state,
    /// so unsubscribing an already-inactive record succeeds silently. The
    /// record itself is retained for later reactivation.
    pub async fn unsubscribe(&self, clone_id: i64, board_id: i64) -> Result<()> {
        let mut tx = self.db.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM subscriptions WHERE clone_id = $1 AND board_id = $2",
        )
        .bind(clone_id)
        .bind(board_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        let Some((id,)) = existing else {
            return Err(ValleyError::SubscriptionNotFound);
        };

        let query = format!(
            "UPDATE subscriptions SET state = $1, updated_at = {} WHERE id = $2",
            SQL_NOW
        );
        sqlx::query(&query)
            .bind(SubscriptionState::Inactive.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;

        info!(subscription_id = id, clone_id, board_id, "Subscription deactivated");
        Ok(())
    }
}

/// Map a stored state string, defaulting unknown values to active.
fn parse_state(s: &str) -> SubscriptionState {
    s.parse().unwrap_or(SubscriptionState::Active)
}

/// Mark a subscription active inside a transaction.
async fn reactivate(tx: &mut sqlx::Transaction<'static, crate::db::Db>, id: i64) -> Result<()> {
    let query = format!(
        "UPDATE subscriptions SET state = $1, updated_at = {} WHERE id = $2",
        SQL_NOW
    );
    sqlx::query(&query)
        .bind(SubscriptionState::Active.as_str())
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;
    Ok(())
}
