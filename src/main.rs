use clap::Parser;
use sitecheck::domain::model::CheckSelection;
use sitecheck::utils::error::ErrorSeverity;
use sitecheck::utils::{logger, validation::Validate};
use sitecheck::{
    AuditEngine, CheckError, CliConfig, DataExporter, LocalStorage, ScraperProfile, StealthClient,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting sitecheck CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let profile = match &config.profile {
        Some(path) => match ScraperProfile::from_file(path) {
            Ok(profile) => profile,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 建議: {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        },
        None => ScraperProfile::default(),
    };

    // Already validated, so this cannot fail here
    let selection = match config.parsed_checks() {
        Ok(categories) => CheckSelection::from_categories(&categories),
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let client = match StealthClient::new(profile) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("❌ Could not build HTTP client: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code_for(&e));
        }
    };

    let engine = AuditEngine::with_limits(
        client,
        config.max_link_checks,
        config.concurrent_requests,
    );
    let report = engine.run(&config.url, &selection).await;

    println!("Bug report for {}", report.url);
    println!(
        "  total: {}  critical: {}  warnings: {}  info: {}",
        report.summary.total,
        report.summary.critical,
        report.summary.warnings,
        report.summary.info
    );
    for (category, issues) in &report.categories {
        if issues.is_empty() {
            continue;
        }
        println!("\n[{}]", category);
        for issue in issues {
            println!("  - [{}] {} — {}", issue.severity, issue.title, issue.location);
        }
    }

    if config.export {
        let exporter = DataExporter::new(
            LocalStorage::new(config.output_path.clone()),
            config.output_path.clone(),
        );
        let report_value = serde_json::to_value(&report).map_err(CheckError::from);
        let exported = match report_value {
            Ok(value) => exporter.export_report(&value, None).await,
            Err(e) => Err(e),
        };

        match exported {
            Ok(path) => {
                tracing::info!("✅ Report exported successfully");
                println!("📁 Report saved to: {}", path);
            }
            Err(e) => {
                tracing::error!(
                    "❌ Report export failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 建議: {}", e.recovery_suggestion());

                let exit_code = exit_code_for(&e);
                if exit_code > 0 {
                    std::process::exit(exit_code);
                }
            }
        }
    }

    Ok(())
}

fn exit_code_for(error: &CheckError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
