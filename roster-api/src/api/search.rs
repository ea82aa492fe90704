//! Hybrid search endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use roster_common::ProfileView;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::services::hybrid_search;
use crate::AppState;

/// Query parameters for GET /api/search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    /// True when the semantic service was unavailable
    pub degraded: bool,
    pub profiles: Vec<ProfileView>,
}

/// GET /api/search?q=
///
/// Runs over the cached roster. Once the roster has been listed, no query
/// (blank or not) reads the data backend; a cold cache performs the initial
/// roster load first.
pub async fn search_profiles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchResponse>> {
    let roster = state.roster.get_or_load(state.backend.as_ref()).await?;
    let outcome = hybrid_search(state.search.as_ref(), &params.q, &roster).await;

    Ok(Json(SearchResponse {
        query: params.q,
        count: outcome.count(),
        degraded: outcome.degraded,
        profiles: outcome.profiles,
    }))
}
