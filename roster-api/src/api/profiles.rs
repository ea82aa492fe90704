//! Roster listing and profile detail endpoints

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use roster_common::{ProfileId, ProfileView};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::services::roster;
use crate::AppState;

/// Listing response
#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub count: usize,
    pub profiles: Vec<ProfileView>,
}

/// GET /api/profiles
///
/// Fetches the approved roster and replaces the cached snapshot.
pub async fn list_profiles(State(state): State<AppState>) -> ApiResult<Json<ProfileListResponse>> {
    let profiles = state.roster.refresh(state.backend.as_ref()).await?;

    Ok(Json(ProfileListResponse {
        count: profiles.len(),
        profiles: profiles.as_ref().clone(),
    }))
}

/// GET /api/profiles/:id
///
/// Links come back with an `https://` scheme. A non-numeric ID is a
/// `BAD_REQUEST` in the usual error shape.
pub async fn get_profile(
    State(state): State<AppState>,
    id: Result<Path<ProfileId>, PathRejection>,
) -> ApiResult<Json<ProfileView>> {
    let Path(id) =
        id.map_err(|e| ApiError::BadRequest(format!("Invalid profile ID: {}", e.body_text())))?;

    match roster::find_profile(state.backend.as_ref(), id).await? {
        Some(profile) => Ok(Json(profile.with_normalized_links())),
        None => {
            tracing::debug!(profile_id = id, "Profile not found");
            Err(ApiError::NotFound(format!("Profile {} not found", id)))
        }
    }
}
