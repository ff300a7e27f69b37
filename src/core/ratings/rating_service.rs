// Rating aggregator - folds public votes into a running mean and applies
// administrative overrides.
//
// No per-vote history is kept. The store performs the read-modify-write of
// `(rating, total_votes)` atomically; this service only supplies the fold.

use super::{Rating, RatingTally, Stars};
use crate::core::listings::{Listing, ListingError, ListingId, ListingStore};
use chrono::Utc;
use tracing::{debug, info};

pub struct RatingService<S: ListingStore> {
    store: S,
}

impl<S: ListingStore> RatingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Cast a public 1-5 star vote.
    ///
    /// Only approved listings accept votes; any other listing is reported as
    /// not found since it is not publicly visible.
    ///
    /// **Returns:** the updated `(rating, total_votes)` pair.
    pub async fn cast_vote(&self, id: ListingId, stars: i64) -> Result<RatingTally, ListingError> {
        let stars = Stars::new(stars)?;

        let tally = self
            .store
            .update_tally(
                id,
                &|listing: &Listing| -> Result<RatingTally, ListingError> {
                    if !listing.is_public() {
                        return Err(ListingError::NotFound(listing.id));
                    }
                    Ok(listing.tally().with_vote(stars))
                },
                Utc::now(),
            )
            .await?;

        debug!(
            listing_id = %id,
            stars = stars.get(),
            rating = %tally.rating,
            total_votes = tally.total_votes,
            "Vote folded into rating"
        );
        Ok(tally)
    }

    /// Set the rating directly. The vote count is left alone, so the two may
    /// disagree afterwards.
    pub async fn override_rating(&self, id: ListingId, rating: f64) -> Result<Rating, ListingError> {
        let rating = Rating::from_f64(rating)?;
        self.store.set_rating(id, rating, Utc::now()).await?;

        info!(listing_id = %id, rating = %rating, "Rating overridden");
        Ok(rating)
    }
}
