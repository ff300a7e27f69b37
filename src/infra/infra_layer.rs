// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "listings/listing_store.rs"]
pub mod listings;
