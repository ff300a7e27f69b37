// Implementations of the ListingStore port.

pub mod in_memory;
pub mod sqlite_store;

// Re-export for convenience
pub use in_memory::InMemoryListingStore;
pub use sqlite_store::SqliteListingStore;
