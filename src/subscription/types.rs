//! Subscription model for Valley.
//!
//! A subscription is the persistent clone-to-board relationship record.
//! For any (clone, board) pair at most one row ever exists: it is created
//! once and thereafter only toggled between active and inactive. There is
//! no transition back to nonexistence.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Activation state of a subscription record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionState {
    /// The clone currently subscribes to the board.
    #[default]
    Active,
    /// The clone unsubscribed; the record is retained for reactivation.
    Inactive,
}

impl SubscriptionState {
    /// Convert state to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionState::Active => "active",
            SubscriptionState::Inactive => "inactive",
        }
    }

    /// Check whether the state is active.
    pub fn is_active(&self) -> bool {
        matches!(self, SubscriptionState::Active)
    }
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SubscriptionState::Active),
            "inactive" => Ok(SubscriptionState::Inactive),
            _ => Err(format!("unknown subscription state: {s}")),
        }
    }
}

/// Subscription entity: the reusable clone-to-board relationship.
#[derive(Debug, Clone)]
pub struct Subscription {
    /// Unique subscription ID. Stable across deactivation/reactivation.
    pub id: i64,
    /// Subscribing clone's ID.
    pub clone_id: i64,
    /// Subscribed board's ID.
    pub board_id: i64,
    /// Current activation state.
    pub state: SubscriptionState,
    /// When the record was first created.
    pub created_at: DateTime<Utc>,
    /// When the record last changed state.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Check whether the subscription is currently active.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_as_str() {
        assert_eq!(SubscriptionState::Active.as_str(), "active");
        assert_eq!(SubscriptionState::Inactive.as_str(), "inactive");
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!(
            "active".parse::<SubscriptionState>().unwrap(),
            SubscriptionState::Active
        );
        assert_eq!(
            "inactive".parse::<SubscriptionState>().unwrap(),
            SubscriptionState::Inactive
        );
        assert_eq!(
            "ACTIVE".parse::<SubscriptionState>().unwrap(),
            SubscriptionState::Active
        );
        assert!("paused".parse::<SubscriptionState>().is_err());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SubscriptionState::Active.to_string(), "active");
        assert_eq!(SubscriptionState::Inactive.to_string(), "inactive");
    }

    #[test]
    fn test_is_active() {
        assert!(SubscriptionState::Active.is_active());
        assert!(!SubscriptionState::Inactive.is_active());
    }
}
