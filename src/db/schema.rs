//! Database schema and migrations for Valley.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users table
    r#"
-- Users who own clones and create boards. Profile management lives
-- outside this crate; only existence and the active flag matter here.
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    nickname    TEXT NOT NULL UNIQUE,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_users_nickname ON users(nickname);
"#,
    // v2: Clones table
    r#"
-- Clones are actor identities. Each clone belongs to exactly one user;
-- posts, replies, and subscriptions are attributed to a clone.
CREATE TABLE clones (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_clones_user_id ON clones(user_id);
"#,
    // v3: Boards table
    r#"
-- Discussion boards. Boards are soft-deleted by flipping lifecycle to
-- 'deleted'; rows are never removed.
CREATE TABLE boards (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL,
    description  TEXT NOT NULL DEFAULT '',
    created_by   INTEGER NOT NULL REFERENCES users(id),
    lifecycle    TEXT NOT NULL DEFAULT 'live',  -- 'live' or 'deleted'
    created_at   TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_boards_created_by ON boards(created_by);
CREATE INDEX idx_boards_lifecycle ON boards(lifecycle);
"#,
    // v4: Posts table
    r#"
-- Posts authored by clones on boards. Soft-deleted like boards.
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id    INTEGER NOT NULL REFERENCES boards(id),
    clone_id    INTEGER NOT NULL REFERENCES clones(id),
    content     TEXT NOT NULL,
    lifecycle   TEXT NOT NULL DEFAULT 'live',  -- 'live' or 'deleted'
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_posts_board_id ON posts(board_id);
CREATE INDEX idx_posts_clone_id ON posts(clone_id);
"#,
    // v5: Replies table
    r#"
-- Replies to posts. A reply counts as live only while both it and its
-- parent post are live.
CREATE TABLE replies (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id),
    clone_id    INTEGER NOT NULL REFERENCES clones(id),
    content     TEXT NOT NULL,
    lifecycle   TEXT NOT NULL DEFAULT 'live',  -- 'live' or 'deleted'
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_replies_post_id ON replies(post_id);
CREATE INDEX idx_replies_clone_id ON replies(clone_id);
"#,
    // v6: Subscriptions table
    r#"
-- Clone-to-board subscriptions. At most one row per (clone, board) pair,
-- ever: the row is created once and thereafter only toggled between
-- 'active' and 'inactive'. The UNIQUE constraint is what lets concurrent
-- subscribers race safely (the loser sees a conflict, not a duplicate).
CREATE TABLE subscriptions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    clone_id    INTEGER NOT NULL REFERENCES clones(id),
    board_id    INTEGER NOT NULL REFERENCES boards(id),
    state       TEXT NOT NULL DEFAULT 'active',  -- 'active' or 'inactive'
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(clone_id, board_id)
);

CREATE INDEX idx_subscriptions_board_id ON subscriptions(board_id);
CREATE INDEX idx_subscriptions_clone_id ON subscriptions(clone_id);
"#,
];
