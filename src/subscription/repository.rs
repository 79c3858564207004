//! Subscription repository for Valley.

use chrono::Utc;

use super::types::{Subscription, SubscriptionState};
use crate::db::{parse_datetime, DbPool};
use crate::{Result, ValleyError};

// SQL datetime function for current timestamp
#[cfg(feature = "sqlite")]
const SQL_NOW: &str = "datetime('now')";
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
const SQL_NOW: &str = "NOW()";

/// Database row for a subscription.
#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    clone_id: i64,
    board_id: i64,
    state: String,
    created_at: String,
    updated_at: String,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            id: row.id,
            clone_id: row.clone_id,
            board_id: row.board_id,
            state: row.state.parse().unwrap_or(SubscriptionState::Active),
            created_at: parse_datetime(&row.created_at).unwrap_or_else(Utc::now),
            updated_at: parse_datetime(&row.updated_at).unwrap_or_else(Utc::now),
        }
    }
}

/// Repository for subscription records.
///
/// Rows in the subscriptions table are never deleted. A `(clone_id, board_id)`
/// pair maps to at most one row for the lifetime of the database, enforced by
/// a unique index; only the `state` column changes after creation.
pub struct SubscriptionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SubscriptionRepository<'a> {
    /// Create a new SubscriptionRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Get a subscription by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, clone_id, board_id, state, created_at, updated_at
            FROM subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(row.map(Subscription::from))
    }

    /// Get the subscription for a (clone, board) pair regardless of state.
    ///
    /// Both active and inactive records are returned; there is at most one.
    pub async fn get_by_pair(&self, clone_id: i64, board_id: i64) -> Result<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, clone_id, board_id, state, created_at, updated_at
            FROM subscriptions
            WHERE clone_id = $1 AND board_id = $2
            "#,
        )
        .bind(clone_id)
        .bind(board_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(row.map(Subscription::from))
    }

    /// Insert an active subscription row, ignoring if one already exists
    /// for the pair.
    ///
    /// Returns the new row's ID, or `None` when the unique index on
    /// `(clone_id, board_id)` swallowed the insert. `None` means some row
    /// for the pair exists in either state; the caller decides whether
    /// that row needs reactivating.
    pub async fn create_active_or_ignore(
        &self,
        clone_id: i64,
        board_id: i64,
    ) -> Result<Option<i64>> {
        let result: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO subscriptions (clone_id, board_id, state)
            VALUES ($1, $2, 'active')
            ON CONFLICT (clone_id, board_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(clone_id)
        .bind(board_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(result.map(|(id,)| id))
    }

    /// Set the state of a subscription and touch its updated_at.
    ///
    /// Returns true if a row was updated.
    pub async fn set_state(&self, id: i64, state: SubscriptionState) -> Result<bool> {
        let query = format!(
            "UPDATE subscriptions SET state = $1, updated_at = {} WHERE id = $2",
            SQL_NOW
        );
        let result = sqlx::query(&query)
            .bind(state.as_str())
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// List active subscriptions for a clone, oldest first.
    pub async fn list_active_for_clone(&self, clone_id: i64) -> Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, clone_id, board_id, state, created_at, updated_at
            FROM subscriptions
            WHERE clone_id = $1 AND state = $2
            ORDER BY id ASC
            "#,
        )
        .bind(clone_id)
        .bind(SubscriptionState::Active.as_str())
        .fetch_all(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    /// Count distinct clones actively subscribed to a board.
    pub async fn count_active_subscribers(&self, board_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT clone_id)
            FROM subscriptions
            WHERE board_id = $1 AND state = $2
            "#,
        )
        .bind(board_id)
        .bind(SubscriptionState::Active.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(count.0)
    }

    /// Count rows stored for a (clone, board) pair in any state.
    ///
    /// The unique index keeps this at zero or one.
    pub async fn count_rows_for_pair(&self, clone_id: i64, board_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM subscriptions WHERE clone_id = $1 AND board_id = $2",
        )
        .bind(clone_id)
        .bind(board_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ValleyError::Storage(e.to_string()))?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardRepository, NewBoard};
    use crate::clone::{CloneRepository, NewClone};
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    async fn create_user(db: &Database, nickname: &str) -> i64 {
        let repo = UserRepository::new(db.pool());
        repo.create(&NewUser::new(nickname)).await.unwrap().id
    }

    async fn create_clone(db: &Database, user_id: i64, name: &str) -> i64 {
        let repo = CloneRepository::new(db.pool());
        repo.create(&NewClone::new(user_id, name)).await.unwrap().id
    }

    async fn create_board(db: &Database, created_by: i64, name: &str) -> i64 {
        let repo = BoardRepository::new(db.pool());
        repo.create(&NewBoard::new(created_by, name)).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_active_subscription() {
        let db = setup_db().await;
        let repo = SubscriptionRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;
        let clone_id = create_clone(&db, user_id, "alpha").await;
        let board_id = create_board(&db, user_id, "general").await;

        let id = repo
            .create_active_or_ignore(clone_id, board_id)
            .await
            .unwrap();
        assert!(id.is_some());

        let sub = repo.get_by_id(id.unwrap()).await.unwrap().unwrap();
        assert_eq!(sub.clone_id, clone_id);
        assert_eq!(sub.board_id, board_id);
        assert_eq!(sub.state, SubscriptionState::Active);
        assert!(sub.is_active());
    }

    #[tokio::test]
    async fn test_create_ignores_existing_pair() {
        let db = setup_db().await;
        let repo = SubscriptionRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;
        let clone_id = create_clone(&db, user_id, "alpha").await;
        let board_id = create_board(&db, user_id, "general").await;

        let first = repo
            .create_active_or_ignore(clone_id, board_id)
            .await
            .unwrap();
        assert!(first.is_some());

        // Second insert for the same pair is swallowed by the unique index.
        let second = repo
            .create_active_or_ignore(clone_id, board_id)
            .await
            .unwrap();
        assert!(second.is_none());

        assert_eq!(repo.count_rows_for_pair(clone_id, board_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_ignores_inactive_pair_too() {
        let db = setup_db().await;
        let repo = SubscriptionRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;
        let clone_id = create_clone(&db, user_id, "alpha").await;
        let board_id = create_board(&db, user_id, "general").await;

        let id = repo
            .create_active_or_ignore(clone_id, board_id)
            .await
            .unwrap()
            .unwrap();
        repo.set_state(id, SubscriptionState::Inactive).await.unwrap();

        // The unique index covers the pair regardless of state.
        let second = repo
            .create_active_or_ignore(clone_id, board_id)
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(repo.count_rows_for_pair(clone_id, board_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_pair_ignores_state() {
        let db = setup_db().await;
        let repo = SubscriptionRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;
        let clone_id = create_clone(&db, user_id, "alpha").await;
        let board_id = create_board(&db, user_id, "general").await;

        assert!(repo.get_by_pair(clone_id, board_id).await.unwrap().is_none());

        let id = repo
            .create_active_or_ignore(clone_id, board_id)
            .await
            .unwrap()
            .unwrap();

        let found = repo.get_by_pair(clone_id, board_id).await.unwrap().unwrap();
        assert_eq!(found.id, id);

        repo.set_state(id, SubscriptionState::Inactive).await.unwrap();

        // Still found after deactivation.
        let found = repo.get_by_pair(clone_id, board_id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.state, SubscriptionState::Inactive);
    }

    #[tokio::test]
    async fn test_set_state_roundtrip() {
        let db = setup_db().await;
        let repo = SubscriptionRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;
        let clone_id = create_clone(&db, user_id, "alpha").await;
        let board_id = create_board(&db, user_id, "general").await;

        let id = repo
            .create_active_or_ignore(clone_id, board_id)
            .await
            .unwrap()
            .unwrap();

        assert!(repo.set_state(id, SubscriptionState::Inactive).await.unwrap());
        let sub = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(sub.state, SubscriptionState::Inactive);

        assert!(repo.set_state(id, SubscriptionState::Active).await.unwrap());
        let sub = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(sub.state, SubscriptionState::Active);

        // Unknown ID updates nothing.
        assert!(!repo.set_state(999, SubscriptionState::Active).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_active_for_clone() {
        let db = setup_db().await;
        let repo = SubscriptionRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;
        let clone_id = create_clone(&db, user_id, "alpha").await;
        let board1 = create_board(&db, user_id, "general").await;
        let board2 = create_board(&db, user_id, "random").await;
        let board3 = create_board(&db, user_id, "news").await;

        repo.create_active_or_ignore(clone_id, board1).await.unwrap();
        let id2 = repo
            .create_active_or_ignore(clone_id, board2)
            .await
            .unwrap()
            .unwrap();
        repo.create_active_or_ignore(clone_id, board3).await.unwrap();

        repo.set_state(id2, SubscriptionState::Inactive).await.unwrap();

        let subs = repo.list_active_for_clone(clone_id).await.unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].board_id, board1);
        assert_eq!(subs[1].board_id, board3);
    }

    #[tokio::test]
    async fn test_count_active_subscribers() {
        let db = setup_db().await;
        let repo = SubscriptionRepository::new(db.pool());
        let user_id = create_user(&db, "miro").await;
        let clone1 = create_clone(&db, user_id, "alpha").await;
        let clone2 = create_clone(&db, user_id, "beta").await;
        let clone3 = create_clone(&db, user_id, "gamma").await;
        let board_id = create_board(&db, user_id, "general").await;

        assert_eq!(repo.count_active_subscribers(board_id).await.unwrap(), 0);

        repo.create_active_or_ignore(clone1, board_id).await.unwrap();
        repo.create_active_or_ignore(clone2, board_id).await.unwrap();
        let id3 = repo
            .create_active_or_ignore(clone3, board_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(repo.count_active_subscribers(board_id).await.unwrap(), 3);

        repo.set_state(id3, SubscriptionState::Inactive).await.unwrap();
        assert_eq!(repo.count_active_subscribers(board_id).await.unwrap(), 2);
    }
}
