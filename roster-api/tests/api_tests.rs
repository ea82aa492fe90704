//! Integration tests for roster-api endpoints
//!
//! Tests cover:
//! - Health and build info
//! - Approved roster listing and the detail view
//! - Multipart submission, including rejection before any network call
//! - Hybrid search over the cached roster

mod helpers;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use helpers::{app, row, FakeBackend, FakeSearch, PLACEHOLDER};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

const BOUNDARY: &str = "roster-test-boundary";

/// Test helper: Create request with empty body
fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Multipart body under construction
#[derive(Default)]
struct Form {
    body: Vec<u8>,
}

impl Form {
    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn into_request(mut self) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Request::builder()
            .method("POST")
            .uri("/api/profiles")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// Test helper: Form with every required field filled in
fn complete_form() -> Form {
    Form::default()
        .text("name", "Priya Patel")
        .text("school", "UC Berkeley Haas")
        .text("location", "Berkeley, CA")
        .text("experience", "Former PM at Stripe")
        .text("interests", "FinTech")
        .text("interests", " Payments ")
        .text("interests", "FinTech")
        .text("looking_for", "Technical co-founder")
        .text("email", "priya@example.com")
        .text("linkedin", "linkedin.com/in/priyapatel")
        .text("instagram", "")
        .file("acceptance_email", "accepted.png", "image/png", &[7u8; 64])
}

fn seeded_backend() -> FakeBackend {
    FakeBackend::with_rows(vec![
        row(1, "Sarah Chen", "Stanford CS", &["Climate Tech", "Robotics"], true),
        row(2, "Marcus Rodriguez", "MIT EECS", &["NLP", "AI Safety"], true),
        row(3, "Hidden Person", "Stanford GSB", &["Stealth"], false),
        row(4, "David Kim", "Carnegie Mellon CS", &["Gaming", "RL"], true),
    ])
}

fn ids(body: &Value) -> Vec<i64> {
    body["profiles"]
        .as_array()
        .expect("profiles array")
        .iter()
        .map(|p| p["id"].as_i64().expect("numeric id"))
        .collect()
}

// =============================================================================
// Health / Build Info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let backend = Arc::new(FakeBackend::default());
    let app = app(backend.clone(), Arc::new(FakeSearch::default()));

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "roster-api");
    assert!(body["uptime_seconds"].is_u64());
    assert_eq!(backend.network_calls(), 0);
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let app = app(Arc::new(FakeBackend::default()), Arc::new(FakeSearch::default()));

    let response = app
        .oneshot(test_request("GET", "/api/buildinfo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["version"].is_string());
    assert!(body["git_hash"].is_string());
}

// =============================================================================
// Listing / Detail
// =============================================================================

#[tokio::test]
async fn test_listing_returns_only_approved_profiles() {
    let app = app(Arc::new(seeded_backend()), Arc::new(FakeSearch::default()));

    let response = app
        .oneshot(test_request("GET", "/api/profiles"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 3);
    assert_eq!(ids(&body), vec![1, 2, 4]);

    let first = &body["profiles"][0];
    assert_eq!(first["lookingFor"], "Collaborators");
    assert_eq!(first["interests"][1], "Robotics");
    assert!(first.get("email").is_none());
}

#[tokio::test]
async fn test_listing_backend_failure_is_bad_gateway() {
    let backend = FakeBackend {
        fail_reads: true,
        ..Default::default()
    };
    let app = app(Arc::new(backend), Arc::new(FakeSearch::default()));

    let response = app
        .oneshot(test_request("GET", "/api/profiles"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BACKEND_ERROR");
    assert_eq!(body["notice"]["variant"], "destructive");
}

#[tokio::test]
async fn test_detail_normalizes_links() {
    let app = app(Arc::new(seeded_backend()), Arc::new(FakeSearch::default()));

    let response = app
        .oneshot(test_request("GET", "/api/profiles/2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["name"], "Marcus Rodriguez");
    assert_eq!(body["linkedin"], "https://linkedin.com/in/2");
    assert!(body["portfolio"].is_null());
}

#[tokio::test]
async fn test_detail_unknown_id_is_not_found() {
    let app = app(Arc::new(seeded_backend()), Arc::new(FakeSearch::default()));

    let response = app
        .oneshot(test_request("GET", "/api/profiles/999"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_detail_non_numeric_id_is_bad_request() {
    let backend = Arc::new(seeded_backend());
    let app = app(backend.clone(), Arc::new(FakeSearch::default()));

    let response = app
        .oneshot(test_request("GET", "/api/profiles/sarah-chen"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].is_string());
    assert_eq!(backend.network_calls(), 0);
}

// =============================================================================
// Submission
// =============================================================================

#[tokio::test]
async fn test_submit_complete_profile() {
    let backend = Arc::new(FakeBackend::default());
    let search = Arc::new(FakeSearch::default());
    let app = app(backend.clone(), search.clone());

    let response = app.oneshot(complete_form().into_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["indexed"], true);
    assert_eq!(body["redirect"], "/");
    assert_eq!(body["notice"]["title"], "Profile submitted successfully!");
    assert_eq!(body["profile"]["image"], PLACEHOLDER);
    assert_eq!(body["profile"]["interests"], serde_json::json!(["FinTech", "Payments"]));
    assert!(body["profile"]["instagram"].is_null());
    assert_eq!(body["profile"]["mukku_approved"], false);

    let uploads = backend.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].0.starts_with("images/"));
    assert!(uploads[0].0.ends_with(".png"));
    assert_eq!(
        body["profile"]["acceptance_email"],
        format!("https://storage.test/public/{}", uploads[0].0)
    );

    assert_eq!(backend.row_count(), 1);
    assert_eq!(*search.indexed.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn test_submit_missing_fields_makes_no_calls() {
    let backend = Arc::new(FakeBackend::default());
    let search = Arc::new(FakeSearch::default());
    let app = app(backend.clone(), search.clone());

    let form = Form::default()
        .text("name", "Priya Patel")
        .text("school", "   ")
        .file("acceptance_email", "accepted.png", "image/png", &[1u8; 8]);

    let response = app.oneshot(form.into_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["notice"]["title"], "Missing required fields");
    assert_eq!(backend.network_calls(), 0);
    assert!(search.indexed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_oversized_image_is_rejected_before_upload() {
    let backend = Arc::new(FakeBackend::default());
    let app = app(backend.clone(), Arc::new(FakeSearch::default()));

    let big = vec![0u8; 6 * 1024 * 1024];
    let form = complete_form().file("image", "huge.jpg", "image/jpeg", &big);

    let response = app.oneshot(form.into_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["notice"]["title"], "File too large");
    assert_eq!(body["notice"]["description"], "File size must be less than 5MB.");
    assert_eq!(backend.network_calls(), 0);
}

#[tokio::test]
async fn test_submit_upload_failure_persists_nothing() {
    let backend = Arc::new(FakeBackend {
        fail_uploads: true,
        ..Default::default()
    });
    let app = app(backend.clone(), Arc::new(FakeSearch::default()));

    let response = app.oneshot(complete_form().into_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["notice"]["title"], "Error submitting profile");
    assert_eq!(backend.inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_submit_with_image_uploads_image_then_acceptance() {
    let backend = Arc::new(FakeBackend::default());
    let app = app(backend.clone(), Arc::new(FakeSearch::default()));

    let form = complete_form().file("image", "headshot.jpg", "image/jpeg", &[3u8; 32]);

    let response = app.oneshot(form.into_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    let uploads = backend.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 2);

    let (image_path, image_type) = &uploads[0];
    assert!(image_path.starts_with("images/"));
    assert!(image_path.ends_with(".jpg"));
    assert_eq!(image_type, "image/jpeg");
    assert!(uploads[1].0.ends_with(".png"));

    let image_url = format!("https://storage.test/public/{}", image_path);
    assert_eq!(body["profile"]["image"], image_url);
    assert_ne!(body["profile"]["image"], PLACEHOLDER);
    assert_eq!(
        body["profile"]["acceptance_email"],
        format!("https://storage.test/public/{}", uploads[1].0)
    );
}

#[tokio::test]
async fn test_submit_insert_failure_skips_indexing() {
    let backend = Arc::new(FakeBackend {
        fail_inserts: true,
        ..Default::default()
    });
    let search = Arc::new(FakeSearch::default());
    let app = app(backend.clone(), search.clone());

    let response = app.oneshot(complete_form().into_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "PERSIST_FAILED");
    assert_eq!(body["notice"]["title"], "Error submitting profile");
    assert_eq!(body["notice"]["variant"], "destructive");

    assert_eq!(backend.inserts.load(Ordering::SeqCst), 1);
    assert_eq!(backend.row_count(), 0);
    assert!(search.indexed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_submissions_create_two_rows() {
    let backend = Arc::new(FakeBackend::default());
    let search = Arc::new(FakeSearch::default());

    for _ in 0..2 {
        let response = app(backend.clone(), search.clone())
            .oneshot(complete_form().into_request())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    assert_eq!(backend.row_count(), 2);
    assert_eq!(*search.indexed.lock().unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn test_indexing_failure_keeps_row() {
    let backend = Arc::new(FakeBackend::default());
    let search = Arc::new(FakeSearch {
        fail_index: true,
        ..Default::default()
    });
    let router = app(backend.clone(), search);

    let response = router
        .clone()
        .oneshot(complete_form().into_request())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["indexed"], false);
    assert!(body.get("redirect").is_none());
    assert_eq!(body["notice"]["title"], "Profile submitted but indexing failed");
    assert_eq!(body["notice"]["variant"], "destructive");

    let id = body["profile"]["id"].as_i64().unwrap();
    let response = router
        .oneshot(test_request("GET", &format!("/api/profiles/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_merges_semantic_and_keyword() {
    // 3 is unapproved and must not surface even when ranked
    let search = Arc::new(FakeSearch::ranking(vec![3, 4]));
    let app = app(Arc::new(seeded_backend()), search.clone());

    let response = app
        .oneshot(test_request("GET", "/api/search?q=Stanford"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["query"], "Stanford");
    assert_eq!(body["degraded"], false);
    assert_eq!(ids(&body), vec![4, 1]);
    assert_eq!(body["count"], 2);
    assert_eq!(search.query_count(), 1);
}

#[tokio::test]
async fn test_blank_search_returns_roster_without_network_calls() {
    let backend = Arc::new(seeded_backend());
    let search = Arc::new(FakeSearch::ranking(vec![2]));
    let router = app(backend.clone(), search.clone());

    let listing = router
        .clone()
        .oneshot(test_request("GET", "/api/profiles"))
        .await
        .unwrap();
    let listed = extract_json(listing.into_body()).await;
    let reads_after_listing = backend.reads.load(Ordering::SeqCst);

    let response = router
        .oneshot(test_request("GET", "/api/search?q=%20%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["profiles"], listed["profiles"]);
    assert_eq!(ids(&body), vec![1, 2, 4]);
    assert_eq!(backend.reads.load(Ordering::SeqCst), reads_after_listing);
    assert_eq!(search.query_count(), 0);
}

#[tokio::test]
async fn test_search_on_cold_cache_loads_roster_once() {
    let backend = Arc::new(seeded_backend());
    let router = app(backend.clone(), Arc::new(FakeSearch::ranking(vec![])));

    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(test_request("GET", "/api/search?q="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(backend.reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_search_degrades_when_service_down() {
    let app = app(Arc::new(seeded_backend()), Arc::new(FakeSearch::default()));

    let response = app
        .oneshot(test_request("GET", "/api/search?q=robotics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["degraded"], true);
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_search_uses_cached_roster() {
    let backend = Arc::new(seeded_backend());
    let router = app(backend.clone(), Arc::new(FakeSearch::ranking(vec![])));

    router
        .clone()
        .oneshot(test_request("GET", "/api/profiles"))
        .await
        .unwrap();
    let reads_after_listing = backend.reads.load(Ordering::SeqCst);

    router
        .clone()
        .oneshot(test_request("GET", "/api/search?q=mit"))
        .await
        .unwrap();
    router
        .oneshot(test_request("GET", "/api/search?q=nlp"))
        .await
        .unwrap();

    assert_eq!(backend.reads.load(Ordering::SeqCst), reads_after_listing);
}
