use super::selector;
use crate::domain::model::{Issue, Severity};
use crate::domain::ports::PageFetcher;
use scraper::Html;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// A link candidate for the broken-link sweep. Keeps the raw href around so
/// findings read the way the page author wrote them.
#[derive(Debug, Clone)]
pub struct LinkTarget {
    pub href: String,
    pub resolved: String,
}

/// Collects up to `cap` unique, probeable link targets from the page.
/// Fragments, mailto:, tel: and javascript: links are not probeable.
pub fn collect_targets(doc: &Html, base_url: &str, cap: usize) -> Vec<LinkTarget> {
    let base = Url::parse(base_url).ok();
    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for anchor in doc.select(&selector("a[href]")) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("javascript:")
        {
            continue;
        }

        let resolved = match &base {
            Some(base) => match base.join(href) {
                Ok(url) => url.to_string(),
                Err(_) => continue,
            },
            None => href.to_string(),
        };

        if seen.insert(resolved.clone()) {
            targets.push(LinkTarget {
                href: href.to_string(),
                resolved,
            });
            if targets.len() == cap {
                break;
            }
        }
    }

    targets
}

/// Probes the targets with HEAD requests, at most `concurrency` in flight.
/// Findings come back in page order regardless of completion order.
pub async fn check_targets<F: PageFetcher + 'static>(
    fetcher: Arc<F>,
    targets: Vec<LinkTarget>,
    concurrency: usize,
) -> Vec<Issue> {
    let mut slots: Vec<Option<Issue>> = (0..targets.len()).map(|_| None).collect();
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, target) in targets.into_iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            (index, probe(fetcher.as_ref(), &target).await)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        if let Ok((index, issue)) = joined {
            if let Some(slot) = slots.get_mut(index) {
                *slot = issue;
            }
        }
    }

    slots.into_iter().flatten().collect()
}

async fn probe<F: PageFetcher>(fetcher: &F, target: &LinkTarget) -> Option<Issue> {
    match fetcher.head_status(&target.resolved).await {
        Ok(status) if status >= 400 => Some(Issue {
            title: format!("Broken Link (HTTP {})", status),
            description: format!("Link returns error status code: {}", status),
            severity: if status >= 500 {
                Severity::Critical
            } else {
                Severity::Warning
            },
            location: format!("Link: {}", target.href),
            suggestion: "Check if the linked resource exists and is accessible".to_string(),
        }),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Link probe failed for {}: {}", target.resolved, e);
            Some(Issue {
                title: "Unreachable Link".to_string(),
                description: "Unable to reach the linked resource".to_string(),
                severity: Severity::Warning,
                location: format!("Link: {}", target.href),
                suggestion: "Verify the link URL and ensure the target server is accessible"
                    .to_string(),
            })
        }
    }
}
