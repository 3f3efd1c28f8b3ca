//! JSON API over the audit, scrape and export engines.

pub mod error;
pub mod routes;

use crate::config::cli::LocalStorage;
use crate::config::profile::ScraperProfile;
use crate::core::audit::AuditEngine;
use crate::core::client::StealthClient;
use crate::core::maps::MapsScraper;
use crate::core::scrape::Scraper;
use crate::export::DataExporter;
use crate::utils::error::Result;
use axum::Router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct AppState {
    pub audit: AuditEngine<StealthClient>,
    pub scraper: Scraper<StealthClient>,
    pub maps: MapsScraper<StealthClient>,
    pub exporter: DataExporter<LocalStorage>,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(profile: ScraperProfile, output_dir: &str) -> Result<Self> {
        let client = Arc::new(StealthClient::new(profile)?);
        Ok(Self {
            audit: AuditEngine::new(Arc::clone(&client)),
            scraper: Scraper::new(Arc::clone(&client)),
            maps: MapsScraper::new(client),
            exporter: DataExporter::new(
                LocalStorage::new(output_dir.to_string()),
                output_dir.to_string(),
            ),
            export_dir: PathBuf::from(output_dir),
        })
    }
}

/// Builds the application router with CORS and request tracing. CORS is
/// permissive because the original UI called these routes from the browser.
pub fn create_app(state: Arc<AppState>) -> Router {
    routes::router()
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = TcpListener::bind(addr).await?;
    info!("sitecheck server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
