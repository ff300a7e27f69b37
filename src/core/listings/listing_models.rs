// Listing domain models - the directory entry and the submission that creates it.
//
// These are pure domain types with no HTTP or database dependencies.
// The web layer deserializes into `Submission`, the infra layer persists `Listing`.

use super::listing_store::ListingError;
use crate::core::ratings::{Rating, RatingTally};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// IDENTITY
// ============================================================================

/// Unique, immutable identity of a listing. Assigned once at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ListingError::Validation(format!("'{}' is not a valid listing id", s)))
    }
}

// ============================================================================
// STATUS
// ============================================================================

/// Moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Waiting in the review queue. Every new listing starts here.
    Pending,
    /// Publicly visible and open for votes.
    Approved,
    /// Hidden. Only reachable by the administrator.
    Rejected,
}

impl ListingStatus {
    pub const ALL: [ListingStatus; 3] = [
        ListingStatus::Pending,
        ListingStatus::Approved,
        ListingStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ListingError::Validation(format!("unknown listing status '{}'", s)))
    }
}

// ============================================================================
// SUBMISSION
// ============================================================================

/// What the public submission form sends.
///
/// Required fields default to empty so a missing field and a blank field
/// both surface as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, alias = "email")]
    pub submitted_by_email: Option<String>,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub followers: Option<u64>,
}

impl Submission {
    /// Check required fields and build a fresh `pending` listing.
    ///
    /// Values are trimmed; blank optional fields are stored as absent.
    pub fn into_listing(self, now: DateTime<Utc>) -> Result<Listing, ListingError> {
        let name = required("name", self.name)?;
        let link = required("link", self.link)?;
        let description = required("description", self.description)?;
        let category = required("category", self.category)?;
        let country = required("country", self.country)?;
        let RatingTally { rating, total_votes } = RatingTally::EMPTY;

        Ok(Listing {
            id: ListingId::new(),
            name,
            link,
            description,
            category,
            country,
            submitted_by_email: optional(self.submitted_by_email),
            creator_name: optional(self.creator_name),
            followers: self.followers,
            status: ListingStatus::Pending,
            rating,
            total_votes,
            verified: false,
            created_at: now,
            updated_at: now,
        })
    }
}

fn required(field: &str, value: String) -> Result<String, ListingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ListingError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// LISTING
// ============================================================================

/// A directory entry ("channel").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub link: String,
    pub description: String,
    pub category: String,
    pub country: String,
    pub submitted_by_email: Option<String>,
    pub creator_name: Option<String>,
    pub followers: Option<u64>,
    pub status: ListingStatus,
    pub rating: Rating,
    pub total_votes: u64,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn tally(&self) -> RatingTally {
        RatingTally {
            rating: self.rating,
            total_votes: self.total_votes,
        }
    }

    /// Only approved listings are visible to the public surface.
    pub fn is_public(&self) -> bool {
        self.status == ListingStatus::Approved
    }
}
