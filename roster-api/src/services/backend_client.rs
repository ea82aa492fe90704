//! Data backend client
//!
//! The roster keeps no local storage. Rows live in a hosted PostgREST table
//! and uploaded images in an object-storage bucket of the same project.
//! [`DataBackend`] is the seam the rest of the service talks to;
//! [`SupabaseClient`] is the HTTP implementation, and tests inject fakes.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use roster_common::config::BackendConfig;
use roster_common::{NewProfile, ProfileId, ProfileRow};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("roster-api/", env!("CARGO_PKG_VERSION"));

/// Data backend errors
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Invalid backend configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Insert returned no row")]
    EmptyInsert,
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Parse(err.to_string())
        } else {
            BackendError::Network(err.to_string())
        }
    }
}

/// Operations the roster needs from the hosted data backend
#[async_trait]
pub trait DataBackend: Send + Sync {
    /// Rows whose approval flag is set
    async fn fetch_approved(&self) -> Result<Vec<ProfileRow>, BackendError>;

    /// Single row by ID, `None` when no such row exists
    async fn fetch_by_id(&self, id: ProfileId) -> Result<Option<ProfileRow>, BackendError>;

    /// Insert one row and return it as stored
    async fn insert_profile(&self, profile: &NewProfile) -> Result<ProfileRow, BackendError>;

    /// Store an object at `path` inside the configured bucket
    async fn upload_object(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), BackendError>;

    /// Publicly resolvable URL of a stored object
    fn public_url(&self, path: &str) -> String;
}

/// PostgREST + storage client for a hosted project
pub struct SupabaseClient {
    http_client: reqwest::Client,
    base_url: String,
    table: String,
    bucket: String,
}

impl SupabaseClient {
    pub fn new(config: &BackendConfig, timeout: Duration) -> Result<Self, BackendError> {
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| BackendError::Config(format!("api key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| BackendError::Config(format!("api key: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            bucket: config.bucket.clone(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn select(&self, filter: (&str, String)) -> Result<Vec<ProfileRow>, BackendError> {
        let response = self
            .http_client
            .get(self.table_url())
            .query(&[("select", "*".to_string()), (filter.0, filter.1)])
            .send()
            .await?;

        let response = error_for_status(response).await?;
        Ok(response.json::<Vec<ProfileRow>>().await?)
    }
}

/// Turn a non-2xx response into [`BackendError::Api`] carrying the body text
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(BackendError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl DataBackend for SupabaseClient {
    async fn fetch_approved(&self) -> Result<Vec<ProfileRow>, BackendError> {
        let rows = self
            .select(("mukku_approved", "eq.true".to_string()))
            .await?;
        tracing::debug!(count = rows.len(), "Fetched approved attendees");
        Ok(rows)
    }

    async fn fetch_by_id(&self, id: ProfileId) -> Result<Option<ProfileRow>, BackendError> {
        let rows = self.select(("id", format!("eq.{}", id))).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<ProfileRow, BackendError> {
        let response = self
            .http_client
            .post(self.table_url())
            .header("Prefer", "return=representation")
            .json(&[profile])
            .send()
            .await?;

        let response = error_for_status(response).await?;
        let rows: Vec<ProfileRow> = response.json().await?;
        let row = rows.into_iter().next().ok_or(BackendError::EmptyInsert)?;

        tracing::info!(profile_id = row.id, "Inserted attendee row");
        Ok(row)
    }

    async fn upload_object(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), BackendError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, path
        );
        let size = bytes.len();

        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        error_for_status(response).await?;
        tracing::debug!(path, size, "Uploaded object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}
