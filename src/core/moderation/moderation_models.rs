// Moderation domain models - administrator decisions and the review queue.

use crate::core::listings::{Listing, ListingError, ListingStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the administrator decides about a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The status a listing ends up in after this decision.
    ///
    /// This does not look at the current status: deciding is a total
    /// function and re-deciding a listing simply overwrites the previous
    /// outcome.
    pub fn target_status(self) -> ListingStatus {
        match self {
            Decision::Approve => ListingStatus::Approved,
            Decision::Reject => ListingStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approve => write!(f, "approve"),
            Decision::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for Decision {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Decision::Approve),
            "reject" => Ok(Decision::Reject),
            other => Err(ListingError::Validation(format!(
                "unknown moderation action '{}'",
                other
            ))),
        }
    }
}

/// Everything the admin panel shows, bucketed by status.
/// Each bucket is ordered most recent first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModerationQueue {
    pub pending: Vec<Listing>,
    pub approved: Vec<Listing>,
    pub rejected: Vec<Listing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_map_to_terminal_statuses() {
        assert_eq!(Decision::Approve.target_status(), ListingStatus::Approved);
        assert_eq!(Decision::Reject.target_status(), ListingStatus::Rejected);
    }

    #[test]
    fn decision_parses_admin_actions() {
        assert_eq!("approve".parse::<Decision>().unwrap(), Decision::Approve);
        assert_eq!("reject".parse::<Decision>().unwrap(), Decision::Reject);
        assert!(matches!(
            "delete".parse::<Decision>(),
            Err(ListingError::Validation(_))
        ));
    }
}
