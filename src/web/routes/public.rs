// Public routes - the directory feed, submissions and votes.

use crate::core::listings::{Listing, ListingError, ListingId, ListingStatus, Submission};
use crate::core::ratings::RatingTally;
use crate::web::error::ApiError;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Approved listings, most recent first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Listing>>, ApiError> {
    let listings = state
        .moderation
        .list_by_status(ListingStatus::Approved)
        .await?;
    Ok(Json(listings))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ApiError> {
    let id: ListingId = id.parse()?;
    let listing = state.moderation.get(id).await?;

    // Pending and rejected listings don't exist as far as the public knows
    if !listing.is_public() {
        return Err(ListingError::NotFound(id).into());
    }
    Ok(Json(listing))
}

pub async fn submit(
    State(state): State<AppState>,
    WithRejection(Json(submission), _): WithRejection<Json<Submission>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.moderation.submit(submission).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub stars: i64,
}

pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<VoteRequest>, ApiError>,
) -> Result<Json<RatingTally>, ApiError> {
    let id: ListingId = id.parse()?;
    let tally = state.ratings.cast_vote(id, req.stars).await?;
    Ok(Json(tally))
}
