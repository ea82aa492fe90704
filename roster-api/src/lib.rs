//! roster-api library - attendee roster service
//!
//! Profile submission, roster listing, profile lookup and hybrid search
//! over a hosted data backend and an external semantic-search service.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod error;
pub mod services;

use services::{DataBackend, RosterCache, SearchIndex, SubmissionService};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn DataBackend>,
    pub search: Arc<dyn SearchIndex>,
    pub submissions: Arc<SubmissionService>,
    /// Last fetched approved roster, read by search
    pub roster: Arc<RosterCache>,
    /// Service start time for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        backend: Arc<dyn DataBackend>,
        search: Arc<dyn SearchIndex>,
        placeholder_image_url: impl Into<String>,
    ) -> Self {
        let submissions = Arc::new(SubmissionService::new(
            backend.clone(),
            search.clone(),
            placeholder_image_url,
        ));

        Self {
            backend,
            search,
            submissions,
            roster: Arc::new(RosterCache::new()),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let profiles = Router::new()
        .route(
            "/api/profiles",
            get(api::list_profiles)
                .post(api::submit_profile)
                .layer(DefaultBodyLimit::max(api::submit::MAX_SUBMISSION_BYTES)),
        )
        .route("/api/profiles/:id", get(api::get_profile))
        .route("/api/search", get(api::search_profiles));

    Router::new()
        .merge(profiles)
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
