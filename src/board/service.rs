//! Board catalog service for Valley.
//!
//! This module provides the high-level board operations consumed by the
//! API layer: creation, single-board and catalog views composed with live
//! statistics, and the per-user / per-clone subscription listings.

use tracing::{debug, info};

use crate::clone::CloneRepository;
use crate::db::{Database, UserRepository};
use crate::stats::StatsService;
use crate::subscription::SubscriptionRepository;
use crate::{Result, ValleyError};

use super::repository::BoardRepository;
use super::types::{Board, BoardInfo, BoardSummary, NewBoard};

/// Maximum length for board names (in characters).
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum length for board descriptions (in characters).
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Validate a board name.
fn validate_name(name: &str) -> Result<()> {
    let char_count = name.chars().count();
    if char_count > MAX_NAME_LENGTH {
        return Err(ValleyError::Validation(format!(
            "board name too long (max {} characters)",
            MAX_NAME_LENGTH
        )));
    }
    if name.trim().is_empty() {
        return Err(ValleyError::Validation(
            "board name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate a board description.
fn validate_description(description: &str) -> Result<()> {
    let char_count = description.chars().count();
    if char_count > MAX_DESCRIPTION_LENGTH {
        return Err(ValleyError::Validation(format!(
            "board description too long (max {} characters)",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

/// Service for board catalog operations.
pub struct BoardService<'a> {
    db: &'a Database,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService with the given database reference.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new board owned by the given user.
    ///
    /// Fails with `UserNotFound` if the user is missing or deactivated.
    pub async fn create_board(
        &self,
        user_id: i64,
        name: &str,
        description: &str,
    ) -> Result<Board> {
        validate_name(name)?;
        validate_description(description)?;

        let user_repo = UserRepository::new(self.db.pool());
        user_repo
            .get_active(user_id)
            .await?
            .ok_or(ValleyError::UserNotFound)?;

        let repo = BoardRepository::new(self.db.pool());
        let board = repo
            .create(&NewBoard::new(user_id, name).with_description(description))
            .await?;

        info!(board_id = board.id, user_id, "Board created");
        Ok(board)
    }

    /// Get a live board composed with its statistics and creator nickname.
    ///
    /// Fails with `BoardNotFound` if the board is missing or soft-deleted.
    pub async fn board_info(&self, board_id: i64) -> Result<BoardInfo> {
        let repo = BoardRepository::new(self.db.pool());
        let board = repo
            .get_live(board_id)
            .await?
            .ok_or(ValleyError::BoardNotFound)?;

        self.compose_info(board).await
    }

    /// List all live boards with their statistics, in creation order.
    pub async fn list_boards(&self) -> Result<Vec<BoardInfo>> {
        let repo = BoardRepository::new(self.db.pool());
        let boards = repo.list_live().await?;

        let mut infos = Vec::with_capacity(boards.len());
        for board in boards {
            infos.push(self.compose_info(board).await?);
        }
        Ok(infos)
    }

    /// List live boards where at least one of the user's clones holds an
    /// active subscription, deduplicated by board.
    ///
    /// Fails with `UserNotFound` if the user is missing or deactivated.
    pub async fn list_boards_for_user(&self, user_id: i64) -> Result<Vec<BoardInfo>> {
        let user_repo = UserRepository::new(self.db.pool());
        user_repo
            .get_active(user_id)
            .await?
            .ok_or(ValleyError::UserNotFound)?;

        let repo = BoardRepository::new(self.db.pool());
        let boards = repo.list_subscribed_by_user(user_id).await?;

        let mut infos = Vec::with_capacity(boards.len());
        for board in boards {
            infos.push(self.compose_info(board).await?);
        }
        Ok(infos)
    }

    /// List the boards a clone actively subscribes to, each paired with
    /// the subscription's own identity so it can be unsubscribed directly.
    ///
    /// Fails with `CloneNotFound` if the clone does not exist. Boards that
    /// were soft-deleted after the clone subscribed are skipped.
    pub async fn list_boards_for_clone(&self, clone_id: i64) -> Result<Vec<BoardSummary>> {
        let clone_repo = CloneRepository::new(self.db.pool());
        if !clone_repo.exists(clone_id).await? {
            return Err(ValleyError::CloneNotFound);
        }

        let sub_repo = SubscriptionRepository::new(self.db.pool());
        let repo = BoardRepository::new(self.db.pool());
        let user_repo = UserRepository::new(self.db.pool());

        let subscriptions = sub_repo.list_active_for_clone(clone_id).await?;

        let mut summaries = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            let Some(board) = repo.get_live(subscription.board_id).await? else {
                debug!(
                    board_id = subscription.board_id,
                    "Skipping soft-deleted board in clone listing"
                );
                continue;
            };
            let creator = user_repo
                .get_by_id(board.created_by)
                .await?
                .ok_or(ValleyError::UserNotFound)?;

            summaries.push(BoardSummary {
                board_id: board.id,
                subscription_id: subscription.id,
                name: board.name,
                description: board.description,
                creator_nickname: creator.nickname,
                created_at: board.created_at,
                updated_at: board.updated_at,
            });
        }
        Ok(summaries)
    }

    /// Soft-delete a board.
    ///
    /// Fails with `BoardNotFound` if the board is missing or already
    /// deleted. Subscriptions, posts, and replies stay untouched; the
    /// lifecycle-filtered read paths hide them from views instead.
    pub async fn delete_board(&self, board_id: i64) -> Result<()> {
        let repo = BoardRepository::new(self.db.pool());
        if !repo.soft_delete(board_id).await? {
            return Err(ValleyError::BoardNotFound);
        }

        info!(board_id, "Board soft-deleted");
        Ok(())
    }

    /// Compose a board with its statistics and creator nickname.
    ///
    /// The creator is looked up without the active filter: a deactivated
    /// user's boards keep showing the nickname.
    async fn compose_info(&self, board: Board) -> Result<BoardInfo> {
        let stats = StatsService::new(self.db).board_stats(board.id).await?;

        let user_repo = UserRepository::new(self.db.pool());
        let creator = user_repo
            .get_by_id(board.created_by)
            .await?
            .ok_or(ValleyError::UserNotFound)?;

        Ok(BoardInfo {
            id: board.id,
            name: board.name,
            creator_nickname: creator.nickname,
            description: board.description,
            subscriber_count: stats.subscriber_count,
            post_count: stats.post_count,
            reply_count: stats.reply_count,
            created_at: board.created_at,
            updated_at: board.updated_at,
        })
    }
}
