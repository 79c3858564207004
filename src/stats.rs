//! Statistics aggregation for Valley.
//!
//! Read-only counts over boards and users. All queries here run without
//! locking and tolerate reading slightly stale data under concurrent writes.

use crate::db::{Database, UserRepository};
use crate::post::{PostRepository, ReplyRepository};
use crate::subscription::SubscriptionRepository;
use crate::{Result, ValleyError};

/// Per-board activity counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStats {
    /// Number of distinct clones with an active subscription to the board.
    pub subscriber_count: i64,
    /// Number of live (not soft-deleted) posts on the board.
    pub post_count: i64,
    /// Number of live replies whose parent post is also live.
    pub reply_count: i64,
}

/// Per-user activity totals across all of the user's clones.
///
/// Totals are lifecycle-blind: soft-deleted posts and replies still count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    /// Distinct posts authored by any of the user's clones.
    pub post_count: i64,
    /// Distinct replies authored by any of the user's clones.
    pub reply_count: i64,
    /// Number of clones the user owns.
    pub clone_count: i64,
}

/// Service for board and user statistics.
pub struct StatsService<'a> {
    db: &'a Database,
}

impl<'a> StatsService<'a> {
    /// Create a new StatsService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Compute activity counts for a board.
    ///
    /// The three counts are computed independently. A soft-deleted post's
    /// replies drop out of the reply count even when the reply rows
    /// themselves are still live. No board existence check is made; a
    /// missing board simply counts to zeros.
    pub async fn board_stats(&self, board_id: i64) -> Result<BoardStats> {
        let subscription_repo = SubscriptionRepository::new(self.db.pool());
        let post_repo = PostRepository::new(self.db.pool());
        let reply_repo = ReplyRepository::new(self.db.pool());

        let subscriber_count = subscription_repo.count_active_subscribers(board_id).await?;
        let post_count = post_repo.count_live_by_board(board_id).await?;
        let reply_count = reply_repo.count_live_by_board(board_id).await?;

        Ok(BoardStats {
            subscriber_count,
            post_count,
            reply_count,
        })
    }

    /// Compute activity totals for an active user.
    ///
    /// Fails with `UserNotFound` when the user is missing or deactivated.
    pub async fn user_stats(&self, user_id: i64) -> Result<UserStats> {
        let user_repo = UserRepository::new(self.db.pool());
        user_repo
            .get_active(user_id)
            .await?
            .ok_or(ValleyError::UserNotFound)?;

        let (post_count, reply_count, clone_count) = user_repo.aggregate_stats(user_id).await?;

        Ok(UserStats {
            post_count,
            reply_count,
            clone_count,
        })
    }
}
