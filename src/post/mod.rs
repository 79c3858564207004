//! Post module for Valley.
//!
//! Posts and replies authored by clones. This crate touches them only as
//! far as the statistics contract requires: creation, soft deletion, and
//! live counting with transitive exclusion under a deleted parent.

mod repository;
mod types;

pub use repository::{PostRepository, ReplyRepository};
pub use types::{NewPost, NewReply, Post, Reply};
