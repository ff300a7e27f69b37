// In-memory implementation of ListingStore.
//
// Used by the test suite and by `DIRECTORY_STORE=memory` for local runs.
// Nothing survives a restart.

use crate::core::listings::{
    Listing, ListingError, ListingId, ListingStatus, ListingStore, TallyFold,
};
use crate::core::ratings::{Rating, RatingTally};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// The uniqueness key for submissions.
#[derive(Hash, Eq, PartialEq, Clone, Debug)]
struct NameLinkKey {
    name: String,
    link: String,
}

impl NameLinkKey {
    fn of(listing: &Listing) -> Self {
        Self {
            name: listing.name.clone(),
            link: listing.link.clone(),
        }
    }
}

/// In-memory implementation of ListingStore.
///
/// **DashMap:**
/// `get_mut` holds the shard's write lock for the duration of the closure,
/// which is what makes `update_tally` atomic per listing.
pub struct InMemoryListingStore {
    listings: DashMap<ListingId, Listing>,
    /// (name, link) -> id, enforces the duplicate rule
    identities: DashMap<NameLinkKey, ListingId>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self {
            listings: DashMap::new(),
            identities: DashMap::new(),
        }
    }

    fn modify<T>(
        &self,
        id: ListingId,
        f: impl FnOnce(&mut Listing) -> Result<T, ListingError>,
    ) -> Result<T, ListingError> {
        let mut entry = self
            .listings
            .get_mut(&id)
            .ok_or(ListingError::NotFound(id))?;
        f(&mut entry)
    }
}

impl Default for InMemoryListingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn insert(&self, listing: Listing) -> Result<(), ListingError> {
        match self.identities.entry(NameLinkKey::of(&listing)) {
            Entry::Occupied(_) => Err(ListingError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(listing.id);
                self.listings.insert(listing.id, listing);
                Ok(())
            }
        }
    }

    async fn get(&self, id: ListingId) -> Result<Option<Listing>, ListingError> {
        Ok(self.listings.get(&id).map(|entry| entry.clone()))
    }

    async fn list_by_status(&self, status: ListingStatus) -> Result<Vec<Listing>, ListingError> {
        let mut listings: Vec<Listing> = self
            .listings
            .iter()
            .filter(|entry| entry.status == status)
            .map(|entry| entry.value().clone())
            .collect();

        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn update_status(
        &self,
        id: ListingId,
        status: ListingStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        self.modify(id, |listing| {
            listing.status = status;
            listing.updated_at = at;
            Ok(())
        })
    }

    async fn set_verified(
        &self,
        id: ListingId,
        verified: bool,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        self.modify(id, |listing| {
            listing.verified = verified;
            listing.updated_at = at;
            Ok(())
        })
    }

    async fn set_rating(
        &self,
        id: ListingId,
        rating: Rating,
        at: DateTime<Utc>,
    ) -> Result<(), ListingError> {
        self.modify(id, |listing| {
            listing.rating = rating;
            listing.updated_at = at;
            Ok(())
        })
    }

    async fn update_tally(
        &self,
        id: ListingId,
        fold: &TallyFold<'_>,
        at: DateTime<Utc>,
    ) -> Result<RatingTally, ListingError> {
        self.modify(id, |listing| {
            let tally = fold(listing)?;
            listing.rating = tally.rating;
            listing.total_votes = tally.total_votes;
            listing.updated_at = at;
            Ok(tally)
        })
    }

    async fn delete(&self, id: ListingId) -> Result<(), ListingError> {
        let (_, listing) = self
            .listings
            .remove(&id)
            .ok_or(ListingError::NotFound(id))?;
        self.identities.remove(&NameLinkKey::of(&listing));
        Ok(())
    }
}
