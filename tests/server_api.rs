#![cfg(feature = "server")]

//! Route-level tests driving the router directly, no listener involved.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use sitecheck::server::{create_app, AppState};
use sitecheck::ScraperProfile;
use std::sync::Arc;
use tower::ServiceExt;

fn fast_profile() -> ScraperProfile {
    ScraperProfile {
        rate_limit_secs: 0.0,
        max_retries: 1,
        error_backoff_secs: [0.0, 0.0],
        rate_limit_backoff_secs: [0.0, 0.0],
        ..Default::default()
    }
}

fn app_in(dir: &tempfile::TempDir) -> axum::Router {
    let output = dir.path().to_string_lossy().to_string();
    let state = AppState::new(fast_profile(), &output).unwrap();
    create_app(Arc::new(state))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_running() {
    let dir = tempfile::tempdir().unwrap();
    let response = app_in(&dir).oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_check_bugs_rejects_missing_url() {
    let dir = tempfile::tempdir().unwrap();
    let response = app_in(&dir)
        .oneshot(post_json("/check-bugs", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "URL is required");
}

#[tokio::test]
async fn test_check_bugs_rejects_non_http_scheme() {
    let dir = tempfile::tempdir().unwrap();
    let response = app_in(&dir)
        .oneshot(post_json(
            "/check-bugs",
            json!({"url": "ftp://example.com", "check_types": {"html": true}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_check_bugs_rejects_empty_selection() {
    let dir = tempfile::tempdir().unwrap();
    let response = app_in(&dir)
        .oneshot(post_json(
            "/check-bugs",
            json!({"url": "https://example.com", "check_types": {}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "At least one check type must be selected");
}

#[tokio::test]
async fn test_scrape_rejects_unknown_type() {
    let dir = tempfile::tempdir().unwrap();
    let response = app_in(&dir)
        .oneshot(post_json("/scrape", json!({"type": "ftp", "url": "x"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid scrape type");
}

#[tokio::test]
async fn test_scrape_maps_requires_query() {
    let dir = tempfile::tempdir().unwrap();
    let response = app_in(&dir)
        .oneshot(post_json("/scrape", json!({"type": "google_maps"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_rejects_empty_data_and_bad_format() {
    let dir = tempfile::tempdir().unwrap();

    let response = app_in(&dir)
        .oneshot(post_json("/export", json!({"data": []})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app_in(&dir)
        .oneshot(post_json(
            "/export",
            json!({"data": [{"name": "x"}], "format": "pdf"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid export format");
}

#[tokio::test]
async fn test_export_report_only_accepts_json() {
    let dir = tempfile::tempdir().unwrap();

    let response = app_in(&dir)
        .oneshot(post_json("/export-report", json!({"report": {}})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app_in(&dir)
        .oneshot(post_json(
            "/export-report",
            json!({"report": {"url": "https://example.com"}, "format": "csv"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_files_download_round_trip() {
    let dir = tempfile::tempdir().unwrap();

    let response = app_in(&dir)
        .oneshot(post_json(
            "/export",
            json!({"data": [{"name": "Cafe", "rating": "4.5"}], "format": "json"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let filepath = body["filepath"].as_str().unwrap().to_string();
    let filename = filepath.rsplit('/').next().unwrap().to_string();

    let response = app_in(&dir).oneshot(get("/files")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let files = body["files"].as_array().unwrap();
    assert!(files
        .iter()
        .any(|f| f.as_str().unwrap().ends_with(&filename)));

    let response = app_in(&dir)
        .oneshot(get(&format!("/download/{}", filename)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&filename));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let exported: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(exported["data"][0]["name"], "Cafe");
}

#[tokio::test]
async fn test_download_accepts_filenames_sharing_the_dir_name_prefix() {
    // Relative export dir whose name is a string prefix of the default
    // export filenames, like the serve default ./scraped_data
    let output = "./scraped";
    let state = AppState::new(fast_profile(), output).unwrap();
    let app = create_app(Arc::new(state));

    let response = app
        .clone()
        .oneshot(post_json(
            "/export",
            json!({"data": [{"name": "Cafe"}], "format": "json"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let filepath = body["filepath"].as_str().unwrap().to_string();
    let filename = filepath.rsplit('/').next().unwrap().to_string();
    assert!(filename.starts_with("scraped_data_"));

    let response = app
        .clone()
        .oneshot(get(&format!("/download/{}", filename)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The handed-out path, directory prefix included, resolves too
    let response = app
        .oneshot(get(&format!(
            "/download/{}",
            filepath.trim_start_matches("./")
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    std::fs::remove_dir_all(output).ok();
}

#[tokio::test]
async fn test_download_confines_paths_to_export_dir() {
    let dir = tempfile::tempdir().unwrap();

    let response = app_in(&dir)
        .oneshot(get("/download/../outside.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app_in(&dir)
        .oneshot(get("/download/nope.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
