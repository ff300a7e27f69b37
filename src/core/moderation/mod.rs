// Core moderation module - the review workflow for submitted listings.
// Following the same pattern as the ratings module.

pub mod moderation_models;
pub mod moderation_service;

pub use moderation_models::*;
pub use moderation_service::*;
