// Moderation service - the listing lifecycle.
//
// This service handles:
// - Public submission (always lands in `pending`)
// - Approve / reject decisions
// - The verified flag
// - Deletion
// - Status listings for the admin queue and the public feed
//
// NO HTTP dependencies here - just domain logic over the ListingStore port.

use super::moderation_models::{Decision, ModerationQueue};
use crate::core::listings::{Listing, ListingError, ListingId, ListingStatus, ListingStore, Submission};
use chrono::Utc;
use tracing::info;

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ModerationService<S: ListingStore> {
    store: S,
}

impl<S: ListingStore> ModerationService<S> {
    /// Create a new moderation service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate a public submission and file it for review.
    ///
    /// **Returns:** the id of the new `pending` listing.
    ///
    /// Fails with `Validation` when a required field is missing and with
    /// `Duplicate` when the store already holds the same name and link.
    pub async fn submit(&self, submission: Submission) -> Result<ListingId, ListingError> {
        let listing = submission.into_listing(Utc::now())?;
        let id = listing.id;
        let category = listing.category.clone();
        let country = listing.country.clone();

        self.store.insert(listing).await?;

        info!(listing_id = %id, %category, %country, "Listing submitted for review");
        Ok(id)
    }

    /// Apply an administrator decision.
    ///
    /// There is no precondition on the current status. Approving twice keeps
    /// the listing approved; approving then rejecting leaves it rejected.
    /// Every call refreshes `updated_at`.
    pub async fn decide(&self, id: ListingId, decision: Decision) -> Result<(), ListingError> {
        let status = decision.target_status();
        self.store.update_status(id, status, Utc::now()).await?;

        info!(listing_id = %id, %decision, %status, "Moderation decision applied");
        Ok(())
    }

    /// Set or clear the verified badge. Allowed in any status.
    pub async fn set_verified(&self, id: ListingId, verified: bool) -> Result<(), ListingError> {
        self.store.set_verified(id, verified, Utc::now()).await?;

        info!(listing_id = %id, verified, "Verified flag updated");
        Ok(())
    }

    /// Purge a listing, whatever its status.
    pub async fn remove(&self, id: ListingId) -> Result<(), ListingError> {
        self.store.delete(id).await?;

        info!(listing_id = %id, "Listing removed");
        Ok(())
    }

    /// Look up a single listing.
    pub async fn get(&self, id: ListingId) -> Result<Listing, ListingError> {
        self.store
            .get(id)
            .await?
            .ok_or(ListingError::NotFound(id))
    }

    /// Listings in one status, most recently created first.
    pub async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ListingError> {
        self.store.list_by_status(status).await
    }

    /// The full review queue for the admin panel.
    pub async fn queue(&self) -> Result<ModerationQueue, ListingError> {
        Ok(ModerationQueue {
            pending: self.store.list_by_status(ListingStatus::Pending).await?,
            approved: self.store.list_by_status(ListingStatus::Approved).await?,
            rejected: self.store.list_by_status(ListingStatus::Rejected).await?,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
