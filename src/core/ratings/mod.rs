// Ratings - running-mean aggregation of public votes.

pub mod rating_models;
pub mod rating_service;

pub use rating_models::{Rating, RatingTally, Stars};
pub use rating_service::RatingService;
