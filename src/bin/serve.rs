use clap::Parser;
use sitecheck::server::{run_server, AppState};
use sitecheck::utils::logger;
use sitecheck::ScraperProfile;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Clone, Parser)]
#[command(name = "serve")]
#[command(about = "Run the sitecheck REST API server")]
struct ServeConfig {
    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "0.0.0.0:5000")]
    addr: String,

    /// Directory exported files are written to and served from
    #[arg(long, default_value = "./scraped_data")]
    output_path: String,

    /// Scraper profile TOML overriding the default fetch behavior
    #[arg(long)]
    profile: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServeConfig::parse();

    logger::init_server_logger();
    tracing::info!("Starting sitecheck server");

    let addr: SocketAddr = config.addr.parse()?;

    let profile = match &config.profile {
        Some(path) => ScraperProfile::from_file(path)?,
        None => ScraperProfile::default(),
    };

    let state = Arc::new(AppState::new(profile, &config.output_path)?);
    run_server(addr, state).await
}
