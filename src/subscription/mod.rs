//! Subscription module for Valley.
//!
//! This module provides the clone-to-board subscription lifecycle: a pair's
//! record is created once, then toggled between active and inactive forever
//! after. Records are never physically deleted.

pub mod repository;
pub mod service;
pub mod types;

pub use repository::SubscriptionRepository;
pub use service::SubscriptionService;
pub use types::{Subscription, SubscriptionState};
