use clap::Parser;
use serde_json::Value;
use sitecheck::domain::model::ContentMode;
use sitecheck::utils::error::{CheckError, Result};
use sitecheck::utils::logger;
use sitecheck::utils::validation::{validate_positive_number, validate_url};
use sitecheck::{
    DataExporter, ExportFormat, LocalStorage, MapsScraper, Scraper, ScraperProfile, StealthClient,
};
use std::sync::Arc;

#[derive(Debug, Clone, Parser)]
#[command(name = "scrape")]
#[command(about = "Scrape URLs or Google Maps listings and export the results")]
struct ScrapeCliConfig {
    /// Comma-delimited URLs to scrape
    #[arg(long, value_delimiter = ',')]
    urls: Vec<String>,

    /// Extract readable text instead of keeping raw HTML
    #[arg(long)]
    text: bool,

    /// Output format: json, csv, llm_jsonl or llm_text
    #[arg(long, default_value = "json")]
    format: String,

    #[arg(long, default_value = "./scraped_data")]
    output_path: String,

    #[arg(long, default_value = "5")]
    concurrency: usize,

    /// Scraper profile TOML overriding the default fetch behavior
    #[arg(long)]
    profile: Option<String>,

    /// Google Maps search query; switches to business-listing mode
    #[arg(long)]
    maps_query: Option<String>,

    #[arg(long, default_value = "")]
    location: String,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

impl ScrapeCliConfig {
    fn parsed_format(&self) -> Result<ExportFormat> {
        self.format
            .parse()
            .map_err(|message| CheckError::ValidationError { message })
    }

    fn validate(&self) -> Result<()> {
        if self.urls.is_empty() && self.maps_query.is_none() {
            return Err(CheckError::ValidationError {
                message: "provide --urls or --maps-query".to_string(),
            });
        }
        for url in &self.urls {
            validate_url("urls", url)?;
        }
        validate_positive_number("concurrency", self.concurrency, 1)?;
        self.parsed_format()?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = ScrapeCliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting sitecheck scraper");

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let profile = match &config.profile {
        Some(path) => match ScraperProfile::from_file(path) {
            Ok(profile) => profile,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        },
        None => ScraperProfile::default(),
    };

    let client = match StealthClient::new(profile) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // Already validated, so this cannot fail here
    let format = match config.parsed_format() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let records: Vec<Value> = if let Some(query) = &config.maps_query {
        let maps = MapsScraper::new(client);
        let businesses = maps.extract_business_info(query, &config.location).await;
        tracing::info!("Extracted {} business listings", businesses.len());
        businesses
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<_, _>>()?
    } else {
        let mode = if config.text {
            ContentMode::Text
        } else {
            ContentMode::Html
        };
        let scraper = Scraper::with_concurrency(client, config.concurrency);
        let outcomes = scraper.bulk_scrape(&config.urls, mode).await;
        tracing::info!("Scraped {} URLs", outcomes.len());
        outcomes
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<_, _>>()?
    };

    if records.is_empty() {
        println!("No records scraped, nothing to export");
        return Ok(());
    }

    let exporter = DataExporter::new(
        LocalStorage::new(config.output_path.clone()),
        config.output_path.clone(),
    );

    match exporter.export(&records, format).await {
        Ok(path) => {
            tracing::info!("✅ Scrape completed successfully!");
            println!("✅ Scraped {} records", records.len());
            println!("📁 Output saved to: {}", path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
