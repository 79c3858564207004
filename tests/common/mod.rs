//! Shared fixtures for integration tests.
//!
//! All helpers go through the public API and panic on failure so test
//! bodies stay focused on the behavior under test.

#![allow(dead_code)]

use valley::{
    BoardService, CloneRepository, Database, NewClone, NewPost, NewReply, NewUser, PostRepository,
    ReplyRepository, UserRepository,
};

/// Open a fresh in-memory database with migrations applied.
pub async fn setup_db() -> Database {
    Database::open_in_memory().await.unwrap()
}

/// Create an active user and return its ID.
pub async fn create_user(db: &Database, nickname: &str) -> i64 {
    UserRepository::new(db.pool())
        .create(&NewUser::new(nickname))
        .await
        .unwrap()
        .id
}

/// Create a clone for the given user and return its ID.
pub async fn create_clone(db: &Database, user_id: i64, name: &str) -> i64 {
    CloneRepository::new(db.pool())
        .create(&NewClone::new(user_id, name))
        .await
        .unwrap()
        .id
}

/// Create a board through the catalog service and return its ID.
pub async fn create_board(db: &Database, user_id: i64, name: &str) -> i64 {
    BoardService::new(db)
        .create_board(user_id, name, "")
        .await
        .unwrap()
        .id
}

/// Create a live post on a board and return its ID.
pub async fn create_post(db: &Database, board_id: i64, clone_id: i64) -> i64 {
    PostRepository::new(db.pool())
        .create(&NewPost::new(board_id, clone_id, "post body"))
        .await
        .unwrap()
        .id
}

/// Create a live reply to a post and return its ID.
pub async fn create_reply(db: &Database, post_id: i64, clone_id: i64) -> i64 {
    ReplyRepository::new(db.pool())
        .create(&NewReply::new(post_id, clone_id, "reply body"))
        .await
        .unwrap()
        .id
}
