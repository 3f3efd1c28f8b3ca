pub mod config;
pub mod core;
pub mod domain;
pub mod export;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, profile::ScraperProfile};

pub use core::{
    audit::AuditEngine, client::StealthClient, maps::MapsScraper, scrape::Scraper,
};
pub use domain::model::{
    AuditReport, Business, Category, CheckSelection, ContentMode, Issue, ScrapeOutcome,
    ScrapeStatus, Severity, Summary,
};
pub use export::{DataExporter, ExportFormat};
pub use utils::error::{CheckError, Result};
