//! Board module for Valley.
//!
//! This module provides the board catalog:
//! - Board creation and soft deletion
//! - Single-board and catalog views composed with live statistics
//! - Subscription-driven listings per user and per clone

mod repository;
mod service;
mod types;

pub use repository::BoardRepository;
pub use service::{BoardService, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH};
pub use types::{Board, BoardInfo, BoardSummary, NewBoard};
