// Admin routes. Everything here sits behind `require_admin`.

use crate::core::listings::{ListingError, ListingId};
use crate::core::moderation::{Decision, ModerationQueue};
use crate::web::auth::AdminClaims;
use crate::web::error::ApiError;
use crate::web::state::AppState;
use axum::{extract::State, Extension, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideRequest {
    pub channel_id: String,
    pub action: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRequest {
    pub channel_id: String,
    pub rating: Option<f64>,
    pub verified: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    pub channel_id: String,
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

pub async fn queue(State(state): State<AppState>) -> Result<Json<ModerationQueue>, ApiError> {
    Ok(Json(state.moderation.queue().await?))
}

pub async fn decide(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminClaims>,
    WithRejection(Json(req), _): WithRejection<Json<DecideRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let id: ListingId = req.channel_id.parse()?;
    let decision: Decision = req.action.parse()?;

    info!(admin = %admin.sub, listing_id = %id, %decision, "Admin decision");
    state.moderation.decide(id, decision).await?;
    Ok(success())
}

/// Rating override and verified flag in one request. The override is
/// applied first; if it fails the flag is left alone.
pub async fn patch(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminClaims>,
    WithRejection(Json(req), _): WithRejection<Json<PatchRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let id: ListingId = req.channel_id.parse()?;

    if req.rating.is_none() && req.verified.is_none() {
        return Err(ListingError::Validation("nothing to update".into()).into());
    }

    info!(admin = %admin.sub, listing_id = %id, "Admin patch");
    if let Some(rating) = req.rating {
        state.ratings.override_rating(id, rating).await?;
    }
    if let Some(verified) = req.verified {
        state.moderation.set_verified(id, verified).await?;
    }
    Ok(success())
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminClaims>,
    WithRejection(Json(req), _): WithRejection<Json<RemoveRequest>, ApiError>,
) -> Result<Json<Value>, ApiError> {
    let id: ListingId = req.channel_id.parse()?;

    info!(admin = %admin.sub, listing_id = %id, "Admin removal");
    state.moderation.remove(id).await?;
    Ok(success())
}
