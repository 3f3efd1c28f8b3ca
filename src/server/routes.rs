use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::domain::model::{CheckSelection, ContentMode};
use crate::export::ExportFormat;
use crate::utils::validation::validate_url;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Component;
use std::sync::Arc;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/check-bugs", post(check_bugs))
        .route("/scrape", post(scrape))
        .route("/export", post(export))
        .route("/export-report", post(export_report))
        .route("/files", get(files))
        .route("/download/{*path}", get(download))
}

async fn index() -> Json<Value> {
    Json(json!({
        "name": "sitecheck",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/health", "/check-bugs", "/scrape", "/export",
            "/export-report", "/files", "/download/{path}",
        ],
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "sitecheck server is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
struct CheckBugsRequest {
    #[serde(default)]
    url: String,
    #[serde(default)]
    check_types: CheckSelection,
}

async fn check_bugs(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckBugsRequest>,
) -> ApiResult<Json<Value>> {
    if request.url.is_empty() {
        return Err(ApiError::bad_request("URL is required"));
    }
    validate_url("url", &request.url).map_err(|e| ApiError::bad_request(e.user_friendly_message()))?;
    if !request.check_types.any() {
        return Err(ApiError::bad_request(
            "At least one check type must be selected",
        ));
    }

    let report = state.audit.run(&request.url, &request.check_types).await;
    Ok(Json(json!({ "status": "success", "data": report })))
}

fn default_scrape_type() -> String {
    "url".to_string()
}

#[derive(Debug, Deserialize)]
struct ScrapeRequest {
    #[serde(rename = "type", default = "default_scrape_type")]
    scrape_type: String,
    #[serde(default)]
    url: String,
    /// Return cleaned main text instead of raw HTML.
    #[serde(default)]
    extract_text: bool,
    #[serde(default)]
    query: String,
    #[serde(default)]
    location: String,
}

async fn scrape(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScrapeRequest>,
) -> ApiResult<Json<Value>> {
    match request.scrape_type.as_str() {
        "url" => {
            if request.url.is_empty() {
                return Err(ApiError::bad_request("URL is required"));
            }
            let mode = if request.extract_text {
                ContentMode::Text
            } else {
                ContentMode::Html
            };
            let outcome = state.scraper.scrape_url(&request.url, mode).await;
            Ok(Json(json!({ "status": "success", "data": outcome })))
        }
        "google_maps" => {
            if request.query.is_empty() {
                return Err(ApiError::bad_request("Search query is required"));
            }
            let businesses = state
                .maps
                .extract_business_info(&request.query, &request.location)
                .await;
            Ok(Json(json!({
                "status": "success",
                "data": businesses,
                "count": businesses.len(),
            })))
        }
        _ => Err(ApiError::bad_request("Invalid scrape type")),
    }
}

#[derive(Debug, Deserialize)]
struct ExportRequest {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default = "default_export_format")]
    format: String,
}

fn default_export_format() -> String {
    "json".to_string()
}

async fn export(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> ApiResult<Json<Value>> {
    if request.data.is_empty() {
        return Err(ApiError::bad_request("No data to export"));
    }
    let format: ExportFormat = request
        .format
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid export format"))?;

    let filepath = state.exporter.export(&request.data, format).await?;
    Ok(Json(json!({ "status": "success", "filepath": filepath })))
}

#[derive(Debug, Deserialize)]
struct ExportReportRequest {
    #[serde(default)]
    report: Value,
    #[serde(default = "default_export_format")]
    format: String,
}

async fn export_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportReportRequest>,
) -> ApiResult<Json<Value>> {
    let empty = match &request.report {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Err(ApiError::bad_request("No report data to export"));
    }
    if request.format != "json" {
        return Err(ApiError::bad_request("Invalid export format"));
    }

    let filepath = state.exporter.export_report(&request.report, None).await?;
    Ok(Json(json!({ "status": "success", "filepath": filepath })))
}

async fn files(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let files = state.exporter.list_exported_files().await?;
    Ok(Json(json!({ "files": files })))
}

/// Streams a previously exported file. Paths are confined to the export
/// directory; the export routes hand out paths carrying the directory
/// prefix, so that prefix is accepted and stripped. Stripping works on
/// path components, not strings, so a filename that merely starts with
/// the directory name is left intact.
async fn download(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> ApiResult<Response> {
    let requested = std::path::PathBuf::from(path.trim_start_matches('/'));
    let requested_parts: Vec<Component> = requested
        .components()
        .filter(|c| !matches!(c, Component::CurDir | Component::RootDir))
        .collect();
    if requested_parts
        .iter()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(ApiError::bad_request("Invalid file path"));
    }

    let export_parts: Vec<Component> = state
        .export_dir
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    let relative: std::path::PathBuf = if requested_parts.len() > export_parts.len()
        && requested_parts.starts_with(&export_parts)
    {
        requested_parts[export_parts.len()..].iter().collect()
    } else {
        requested_parts.iter().collect()
    };

    let full_path = state.export_dir.join(&relative);
    let bytes = tokio::fs::read(&full_path)
        .await
        .map_err(|_| ApiError::not_found("File not found"))?;

    let filename = relative
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
