//! Soft-delete lifecycle state shared by boards, posts, and replies.

use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a soft-deletable record.
///
/// Records are never physically removed; deletion flips this state to
/// `Deleted`, and every catalog/statistics read path filters on `Live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// The record is visible and counted.
    #[default]
    Live,
    /// The record is soft-deleted: hidden from reads, still stored.
    Deleted,
}

impl Lifecycle {
    /// Convert lifecycle state to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Live => "live",
            Lifecycle::Deleted => "deleted",
        }
    }

    /// Check whether the record is live.
    pub fn is_live(&self) -> bool {
        matches!(self, Lifecycle::Live)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Lifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(Lifecycle::Live),
            "deleted" => Ok(Lifecycle::Deleted),
            _ => Err(format!("unknown lifecycle state: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_as_str() {
        assert_eq!(Lifecycle::Live.as_str(), "live");
        assert_eq!(Lifecycle::Deleted.as_str(), "deleted");
    }

    #[test]
    fn test_lifecycle_from_str() {
        assert_eq!("live".parse::<Lifecycle>().unwrap(), Lifecycle::Live);
        assert_eq!("deleted".parse::<Lifecycle>().unwrap(), Lifecycle::Deleted);
        assert_eq!("LIVE".parse::<Lifecycle>().unwrap(), Lifecycle::Live);
        assert!("gone".parse::<Lifecycle>().is_err());
    }

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(Lifecycle::Live.to_string(), "live");
        assert_eq!(Lifecycle::Deleted.to_string(), "deleted");
    }

    #[test]
    fn test_is_live() {
        assert!(Lifecycle::Live.is_live());
        assert!(!Lifecycle::Deleted.is_live());
    }

    #[test]
    fn test_default_is_live() {
        assert_eq!(Lifecycle::default(), Lifecycle::Live);
    }
}
