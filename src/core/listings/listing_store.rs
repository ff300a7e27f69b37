// Storage port for listings.
//
// The core defines WHAT it needs from persistence; `infra/listings` provides
// the SQLite and in-memory implementations.

use super::listing_models::{Listing, ListingId, ListingStatus};
use crate::core::ratings::{Rating, RatingTally};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Everything that can go wrong in the directory core.
///
/// The first three are caller errors and map to distinct user-facing messages.
/// `StorageError` is an infrastructure failure.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Listing {0} not found")]
    NotFound(ListingId),

    #[error("This channel has already been submitted")]
    Duplicate,

    #[error("Storage error: {0}")]
    StorageError(String),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Computes the next tally from the current state of a listing.
///
/// Runs inside the store's atomic section for that listing, so it must be
/// quick and must not block.
pub type TallyFold<'a> = dyn Fn(&Listing) -> Result<RatingTally, ListingError> + Send + Sync + 'a;

/// Trait for persisting listings.
///
/// Every method that targets a single listing fails with
/// `ListingError::NotFound` when the id is unknown.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Insert a new listing. Fails with `Duplicate` when the `(name, link)`
    /// pair already exists.
    async fn insert(&self, listing: Listing) -> Result<(), ListingError>;

    /// Look up a single listing.
    async fn get(&self, id: ListingId) -> Result<Option<Listing>, ListingError>;

    /// All listings in `status`, most recently created first.
    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ListingError>;

    /// Overwrite the status (last write wins).
    async fn update_status(
        &self,
        id: ListingId,
        status: ListingStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError>;

    /// Overwrite the verified flag (last write wins).
    async fn set_verified(
        &self,
        id: ListingId,
        verified: bool,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError>;

    /// Overwrite the rating without touching the vote count.
    async fn set_rating(
        &self,
        id: ListingId,
        rating: Rating,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError>;

    /// Atomic read-modify-write of `(rating, total_votes)`.
    ///
    /// Concurrent calls for the same listing must all be applied; none may
    /// be lost to a last-write-wins race. Readers never observe one field
    /// updated without the other.
    async fn update_tally(
        &self,
        id: ListingId,
        fold: &TallyFold<'_>,
        at: DateTime<Utc>,
    ) -> Result<RatingTally, ListingError>;

    /// Purge a listing.
    async fn delete(&self, id: ListingId) -> Result<(), ListingError>;
}

// Services share one store between them, so let an `Arc` of any store
// (including `Arc<dyn ListingStore>`) stand in for the store itself.
#[async_trait]
impl<T: ListingStore + ?Sized> ListingStore for Arc<T> {
    async fn insert(&self, listing: Listing) -> Result<(), ListingError> {
        (**self).insert(listing).await
    }

    async fn get(&self, id: ListingId) -> Result<Option<Listing>, ListingError> {
        (**self).get(id).await
    }

    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ListingError> {
        (**self).list_by_status(status).await
    }

    async fn update_status(
        &self,
        id: ListingId,
        status: ListingStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        (**self).update_status(id, status, at).await
    }

    async fn set_verified(
        &self,
        id: ListingId,
        verified: bool,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        (**self).set_verified(id, verified, at).await
    }

    async fn set_rating(
        &self,
        id: ListingId,
        rating: Rating,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        (**self).set_rating(id, rating, at).await
    }

    async fn update_tally(
        &self,
        id: ListingId,
        fold: &TallyFold<'_>,
        at: DateTime<Utc>,
    ) -> Result<RatingTally, ListingError> {
        (**self).update_tally(id, fold, at).await
    }

    async fn delete(&self, id: ListingId) -> Result<(), ListingError> {
        (**self).delete(id).await
    }
}
