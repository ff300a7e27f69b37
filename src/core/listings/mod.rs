// Listings - the single entity of the directory and its storage port.

pub mod listing_models;
pub mod listing_store;

pub use listing_models::*;
pub use listing_store::*;
