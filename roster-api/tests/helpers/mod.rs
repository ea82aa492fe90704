//! In-memory collaborators for driving the router without a network

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use roster_api::services::search_client::IndexResponse;
use roster_api::services::{BackendError, DataBackend, SearchError, SearchIndex};
use roster_api::{build_router, AppState};
use roster_common::{NewProfile, ProfileId, ProfileRow};
use serde_json::json;

pub const PLACEHOLDER: &str = "https://placehold.test/profile.png";

/// Test helper: Build a stored row
pub fn row(id: ProfileId, name: &str, school: &str, interests: &[&str], approved: bool) -> ProfileRow {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "school": school,
        "location": "San Francisco, CA",
        "experience": "Builder",
        "interests": interests,
        "looking_for": "Collaborators",
        "linkedin": format!("linkedin.com/in/{}", id),
        "portfolio": "",
        "mukku_approved": approved,
    }))
    .expect("valid row")
}

/// Data backend held in memory
///
/// `fetch_approved` returns every stored row, approved or not, so the
/// service's own approval filter is what the tests observe.
#[derive(Default)]
pub struct FakeBackend {
    pub rows: Mutex<Vec<ProfileRow>>,
    pub uploads: Mutex<Vec<(String, String)>>,
    pub reads: AtomicUsize,
    pub inserts: AtomicUsize,
    pub fail_reads: bool,
    pub fail_uploads: bool,
    pub fail_inserts: bool,
    pub next_id: AtomicI64,
}

impl FakeBackend {
    pub fn with_rows(rows: Vec<ProfileRow>) -> Self {
        let next_id = rows.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            rows: Mutex::new(rows),
            next_id: AtomicI64::new(next_id),
            ..Default::default()
        }
    }

    pub fn network_calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
            + self.inserts.load(Ordering::SeqCst)
            + self.uploads.lock().unwrap().len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl DataBackend for FakeBackend {
    async fn fetch_approved(&self) -> Result<Vec<ProfileRow>, BackendError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(BackendError::Network("connection refused".to_string()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn fetch_by_id(&self, id: ProfileId) -> Result<Option<ProfileRow>, BackendError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(BackendError::Network("connection refused".to_string()));
        }
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<ProfileRow, BackendError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts {
            return Err(BackendError::Api {
                status: 400,
                message: "null value in column \"school\"".to_string(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;

        let mut value = serde_json::to_value(profile).map_err(|e| BackendError::Parse(e.to_string()))?;
        value["id"] = json!(id);
        value["mukku_approved"] = json!(false);
        let row: ProfileRow =
            serde_json::from_value(value).map_err(|e| BackendError::Parse(e.to_string()))?;

        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn upload_object(
        &self,
        path: &str,
        content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<(), BackendError> {
        if self.fail_uploads {
            return Err(BackendError::Api {
                status: 500,
                message: "storage unavailable".to_string(),
            });
        }
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_string(), content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/public/{}", path)
    }
}

/// Search service held in memory
#[derive(Default)]
pub struct FakeSearch {
    /// IDs returned by `top_k`; `None` makes it fail
    pub ranking: Option<Vec<ProfileId>>,
    pub fail_index: bool,
    pub indexed: Mutex<Vec<ProfileId>>,
    pub queries: AtomicUsize,
}

impl FakeSearch {
    pub fn ranking(ids: Vec<ProfileId>) -> Self {
        Self {
            ranking: Some(ids),
            ..Default::default()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchIndex for FakeSearch {
    async fn index_profile(&self, profile: &ProfileRow) -> Result<IndexResponse, SearchError> {
        if self.fail_index {
            return Err(SearchError::Api(503, "vector store offline".to_string()));
        }
        self.indexed.lock().unwrap().push(profile.id);
        Ok(IndexResponse {
            message: "Profile indexed".to_string(),
            success: true,
        })
    }

    async fn top_k(&self, _query: &str) -> Result<Vec<ProfileId>, SearchError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.ranking
            .clone()
            .ok_or_else(|| SearchError::Network("connection refused".to_string()))
    }
}

/// Test helper: Router wired to the given fakes
pub fn app(backend: Arc<FakeBackend>, search: Arc<FakeSearch>) -> axum::Router {
    build_router(AppState::new(backend, search, PLACEHOLDER))
}
