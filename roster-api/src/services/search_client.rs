//! Semantic search service client
//!
//! Two endpoints of the external search service are used:
//! - `POST /index_profile` registers a freshly inserted row
//! - `POST /fetch_top_k_profiles` returns profile IDs ranked for a query

use async_trait::async_trait;
use roster_common::{ProfileId, ProfileRow};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("roster-api/", env!("CARGO_PKG_VERSION"));

/// Search service errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Search service error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Indexing rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Parse(err.to_string())
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

/// `/index_profile` response body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub success: bool,
}

#[derive(Serialize)]
struct IndexRequest<'a> {
    profile: &'a ProfileRow,
}

#[derive(Serialize)]
struct TopKRequest<'a> {
    query: &'a str,
}

/// `/fetch_top_k_profiles` response body
#[derive(Debug, Deserialize)]
struct TopKResponse {
    results: Vec<RawProfileId>,
}

/// Vector stores key records by string, so IDs may come back either way
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawProfileId {
    Number(ProfileId),
    Text(String),
}

impl RawProfileId {
    fn parse(self) -> Option<ProfileId> {
        match self {
            RawProfileId::Number(id) => Some(id),
            RawProfileId::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Operations the roster needs from the semantic search service
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Make a persisted row discoverable by semantic search
    async fn index_profile(&self, profile: &ProfileRow) -> Result<IndexResponse, SearchError>;

    /// Profile IDs ranked by semantic relevance to `query`
    async fn top_k(&self, query: &str) -> Result<Vec<ProfileId>, SearchError>;
}

/// HTTP client for the search service
pub struct HttpSearchClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpSearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<reqwest::Response, SearchError> {
        let response = self
            .http_client
            .post(format!("{}/{}", self.base_url, endpoint))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::Api(status.as_u16(), error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl SearchIndex for HttpSearchClient {
    async fn index_profile(&self, profile: &ProfileRow) -> Result<IndexResponse, SearchError> {
        let response = self
            .post("index_profile", &IndexRequest { profile })
            .await?;
        let body: IndexResponse = response.json().await?;

        // The service answers 200 with success=false when its own pipeline fails
        if !body.success {
            return Err(SearchError::Rejected(body.message));
        }

        tracing::info!(profile_id = profile.id, message = %body.message, "Profile indexed");
        Ok(body)
    }

    async fn top_k(&self, query: &str) -> Result<Vec<ProfileId>, SearchError> {
        let response = self
            .post("fetch_top_k_profiles", &TopKRequest { query })
            .await?;
        let body: TopKResponse = response.json().await?;

        let total = body.results.len();
        let ids: Vec<ProfileId> = body
            .results
            .into_iter()
            .filter_map(RawProfileId::parse)
            .collect();
        if ids.len() != total {
            tracing::warn!(
                dropped = total - ids.len(),
                "Ignoring non-numeric profile IDs from search service"
            );
        }

        tracing::debug!(results = ids.len(), "Semantic search returned");
        Ok(ids)
    }
}
