// Rating domain models - fixed-point ratings, star votes and the running tally.
//
// Ratings are stored as whole tenths (0..=50) so every implementation rounds
// the same way. Floating point only appears at the serialization boundary.

use crate::core::listings::ListingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest rating, in tenths (5.0).
pub const MAX_RATING_TENTHS: u16 = 50;

/// A rating in `[0.0, 5.0]` with one decimal of precision.
///
/// Serializes as a plain JSON number (`4.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Rating(u16);

impl Rating {
    pub const ZERO: Rating = Rating(0);

    pub fn from_tenths(tenths: u16) -> Result<Self, ListingError> {
        if tenths > MAX_RATING_TENTHS {
            return Err(ListingError::Validation(format!(
                "rating must be between 0 and 5, got {}.{}",
                tenths / 10,
                tenths % 10
            )));
        }
        Ok(Self(tenths))
    }

    /// Accept an administrator-supplied value, rounded to one decimal
    /// (ties away from zero).
    pub fn from_f64(value: f64) -> Result<Self, ListingError> {
        if !value.is_finite() || !(0.0..=5.0).contains(&value) {
            return Err(ListingError::Validation(format!(
                "rating must be between 0 and 5, got {}",
                value
            )));
        }
        Self::from_tenths((value * 10.0).round() as u16)
    }

    pub fn tenths(self) -> u16 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.as_f64()
    }
}

impl TryFrom<f64> for Rating {
    type Error = ListingError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rating::from_f64(value)
    }
}

/// A single public vote, 1 to 5 stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stars(u8);

impl Stars {
    pub fn new(value: i64) -> Result<Self, ListingError> {
        if !(1..=5).contains(&value) {
            return Err(ListingError::Validation(format!(
                "vote must be between 1 and 5 stars, got {}",
                value
            )));
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// The aggregate a listing carries instead of individual votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RatingTally {
    pub rating: Rating,
    pub total_votes: u64,
}

impl RatingTally {
    pub const EMPTY: RatingTally = RatingTally {
        rating: Rating::ZERO,
        total_votes: 0,
    };

    /// Fold one vote into the running mean.
    ///
    /// `new = round10((rating * n + stars) / (n + 1))`, computed on the
    /// stored (already rounded) rating. Rounding therefore accumulates per
    /// vote and the result can drift from the exact mean of all votes.
    pub fn with_vote(self, stars: Stars) -> RatingTally {
        let n = self.total_votes;
        let sum_tenths = u128::from(self.rating.tenths()) * u128::from(n)
            + u128::from(stars.get()) * 10;
        let total_votes = n + 1;

        RatingTally {
            rating: Rating(round_div(sum_tenths, u128::from(total_votes))),
            total_votes,
        }
    }
}

/// Integer division rounded to nearest, ties away from zero (inputs are non-negative).
///
/// The quotient of a mean of values in `0..=50` never leaves that range.
fn round_div(numerator: u128, denominator: u128) -> u16 {
    ((2 * numerator + denominator) / (2 * denominator)) as u16
}
