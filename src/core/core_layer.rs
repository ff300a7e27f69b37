// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "listings/mod.rs"]
pub mod listings;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "ratings/mod.rs"]
pub mod ratings;
