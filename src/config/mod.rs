pub mod cli;
pub mod profile;

#[cfg(feature = "cli")]
use crate::domain::model::Category;
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::{CheckError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sitecheck")]
#[command(about = "Check a website for HTML, link, performance, accessibility, SEO and JavaScript issues")]
pub struct CliConfig {
    /// Page to audit
    #[arg(long)]
    pub url: String,

    /// Comma-delimited check categories to run
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "html,links,performance,accessibility,seo,javascript"
    )]
    pub checks: Vec<String>,

    #[arg(long, default_value = "./bug_reports")]
    pub output_path: String,

    /// Write the report to a timestamped JSON file under the output path
    #[arg(long)]
    pub export: bool,

    /// Cap on how many page links get probed for breakage
    #[arg(long, default_value = "10")]
    pub max_link_checks: usize,

    #[arg(long, default_value = "5")]
    pub concurrent_requests: usize,

    /// Scraper profile TOML overriding the default fetch behavior
    #[arg(long)]
    pub profile: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn parsed_checks(&self) -> Result<Vec<Category>> {
        let mut categories = Vec::new();
        for raw in &self.checks {
            let category = raw
                .parse::<Category>()
                .map_err(|message| CheckError::ValidationError { message })?;
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        if categories.is_empty() {
            return Err(CheckError::ValidationError {
                message: "at least one check category must be selected".to_string(),
            });
        }
        Ok(categories)
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn target_url(&self) -> &str {
        &self.url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn max_link_checks(&self) -> usize {
        self.max_link_checks
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("url", &self.url)?;
        validate_path("output_path", &self.output_path)?;
        validate_positive_number("max_link_checks", self.max_link_checks, 1)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        self.parsed_checks()?;
        Ok(())
    }
}
