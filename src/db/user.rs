//! User model for Valley.
//!
//! Users here are thin: only existence, the nickname shown on board views,
//! and the active flag matter to this crate. Profile management belongs to
//! an external service.

use chrono::{DateTime, Utc};

/// User entity.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Display name / handle (unique).
    pub nickname: String,
    /// Whether the account is active. Inactive users fail the lookups
    /// that gate board creation and per-user statistics.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name / handle.
    pub nickname: String,
    /// Whether the account starts active (defaults to true).
    pub is_active: bool,
}

impl NewUser {
    /// Create a new user with the given nickname.
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            is_active: true,
        }
    }

    /// Set the initial active state.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults_to_active() {
        let user = NewUser::new("miro");
        assert_eq!(user.nickname, "miro");
        assert!(user.is_active);
    }

    #[test]
    fn test_new_user_with_active() {
        let user = NewUser::new("dormant").with_active(false);
        assert!(!user.is_active);
    }
}
