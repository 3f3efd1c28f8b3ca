pub mod accessibility;
pub mod html;
pub mod javascript;
pub mod links;
pub mod performance;
pub mod seo;

use crate::domain::model::{AuditReport, Category, CheckSelection, Issue, Severity};
use crate::domain::ports::PageFetcher;
use crate::utils::error::CheckError;
use scraper::{Html, Selector};
use std::sync::Arc;

/// Parses a selector literal. Only ever called with static CSS baked into
/// the check modules.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector literal")
}

/// Runs the selected check categories against a single page and folds the
/// findings into a report.
pub struct AuditEngine<F: PageFetcher + 'static> {
    fetcher: Arc<F>,
    max_link_checks: usize,
    link_concurrency: usize,
}

impl<F: PageFetcher + 'static> AuditEngine<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self::with_limits(fetcher, 10, 5)
    }

    pub fn with_limits(fetcher: Arc<F>, max_link_checks: usize, link_concurrency: usize) -> Self {
        Self {
            fetcher,
            max_link_checks,
            link_concurrency,
        }
    }

    /// A fetch failure is itself a finding, not an abort: the report comes
    /// back with a critical connection issue and empty categories.
    pub async fn run(&self, url: &str, selection: &CheckSelection) -> AuditReport {
        let mut report = AuditReport::new(url);
        tracing::info!("Auditing {}", url);

        let page = match self.fetcher.fetch_page(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Could not fetch {}: {}", url, e);
                report.push_issue(Category::Performance, connection_error_issue(url, &e));
                report.recompute_summary();
                return report;
            }
        };

        // The parsed document is not Send, so everything that needs it runs
        // in this block; the link sweep awaits afterwards on plain strings.
        let link_targets = {
            let doc = Html::parse_document(&page.body);

            if selection.html {
                report.set_issues(Category::Html, html::check(&doc, &page.body));
            }
            if selection.performance {
                report.set_issues(
                    Category::Performance,
                    performance::check(&doc, page.body.len(), page.fetch_time),
                );
            }
            if selection.accessibility {
                report.set_issues(Category::Accessibility, accessibility::check(&doc));
            }
            if selection.seo {
                report.set_issues(Category::Seo, seo::check(&doc));
            }
            if selection.javascript {
                report.set_issues(Category::Javascript, javascript::check(&doc));
            }
            if selection.links {
                links::collect_targets(&doc, url, self.max_link_checks)
            } else {
                Vec::new()
            }
        };

        if selection.links {
            let issues =
                links::check_targets(self.fetcher.clone(), link_targets, self.link_concurrency)
                    .await;
            report.set_issues(Category::Links, issues);
        }

        report.recompute_summary();
        tracing::info!(
            "Audit of {} found {} issues ({} critical)",
            url,
            report.summary.total,
            report.summary.critical
        );
        report
    }
}

fn connection_error_issue(url: &str, error: &CheckError) -> Issue {
    Issue {
        title: "Connection Error".to_string(),
        description: format!("Unable to connect to website: {}", error),
        severity: Severity::Critical,
        location: url.to_string(),
        suggestion: "Check if the URL is correct and the website is accessible".to_string(),
    }
}
