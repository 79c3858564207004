//! Valley - board catalog and clone subscription core.
//!
//! Valley manages discussion boards, the subscription relationship between
//! clones (actor identities) and boards, and the live statistics derived
//! from both. Subscriptions are never deleted, only toggled between active
//! and inactive; boards, posts, and replies are soft-deleted and excluded
//! from views at query time.

pub mod board;
pub mod clone;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod post;
pub mod stats;
pub mod subscription;

pub use board::{Board, BoardInfo, BoardRepository, BoardService, BoardSummary, NewBoard};
pub use clone::{Clone, CloneRepository, NewClone};
pub use config::Config;
pub use db::{Database, Lifecycle, NewUser, User, UserRepository};
pub use error::{Result, ValleyError};
pub use post::{NewPost, NewReply, Post, PostRepository, Reply, ReplyRepository};
pub use stats::{BoardStats, StatsService, UserStats};
pub use subscription::{
    Subscription, SubscriptionRepository, SubscriptionService, SubscriptionState,
};
