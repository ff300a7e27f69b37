// Shared state handed to every HTTP handler.

use super::auth::SessionVerifier;
use crate::core::listings::ListingStore;
use crate::core::moderation::ModerationService;
use crate::core::ratings::RatingService;
use std::sync::Arc;

/// The store both services share. Boxed behind a trait object so the
/// composition root can pick SQLite or in-memory at startup.
pub type SharedStore = Arc<dyn ListingStore>;

#[derive(Clone)]
pub struct AppState {
    pub moderation: Arc<ModerationService<SharedStore>>,
    pub ratings: Arc<RatingService<SharedStore>>,
    pub sessions: Arc<SessionVerifier>,
}

impl AppState {
    pub fn new(store: SharedStore, sessions: SessionVerifier) -> Self {
        Self {
            moderation: Arc::new(ModerationService::new(Arc::clone(&store))),
            ratings: Arc::new(RatingService::new(store)),
            sessions: Arc::new(sessions),
        }
    }
}
