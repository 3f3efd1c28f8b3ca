use crate::core::extract;
use crate::domain::model::{ContentMode, ScrapeOutcome, ScrapeStatus};
use crate::domain::ports::PageFetcher;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Scrapes pages through the anti-detection fetch layer. Bulk runs are
/// concurrent but bounded, with a politeness pause per request.
pub struct Scraper<F: PageFetcher + 'static> {
    fetcher: Arc<F>,
    concurrency: usize,
}

impl<F: PageFetcher + 'static> Scraper<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self::with_concurrency(fetcher, 5)
    }

    pub fn with_concurrency(fetcher: Arc<F>, concurrency: usize) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Exhausted retries yield a `failed` outcome, not an error; a bulk run
    /// always produces one outcome per input URL.
    pub async fn scrape_url(&self, url: &str, mode: ContentMode) -> ScrapeOutcome {
        scrape_one(self.fetcher.as_ref(), url, mode).await
    }

    /// Outcomes come back in input order regardless of completion order.
    pub async fn bulk_scrape(&self, urls: &[String], mode: ContentMode) -> Vec<ScrapeOutcome> {
        let total = urls.len();
        let mut slots: Vec<Option<ScrapeOutcome>> = (0..total).map(|_| None).collect();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().cloned().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                if index > 0 {
                    fetcher.polite_delay().await;
                }
                tracing::info!("Scraping {}/{}: {}", index + 1, total, url);
                let outcome = scrape_one(fetcher.as_ref(), &url, mode).await;
                (index, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Ok((index, outcome)) = joined {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(outcome);
                }
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| ScrapeOutcome::failed(urls.get(index).map_or("", |u| u)))
            })
            .collect()
    }
}

async fn scrape_one<F: PageFetcher>(fetcher: &F, url: &str, mode: ContentMode) -> ScrapeOutcome {
    match fetcher.fetch_page(url).await {
        Ok(page) => match mode {
            ContentMode::Text => ScrapeOutcome {
                url: url.to_string(),
                status: ScrapeStatus::Success,
                // A page can be reachable yet have no readable text
                content: extract::extract_text(&page.body),
                title: None,
                method: Some(ContentMode::Text),
            },
            ContentMode::Html => {
                let title = extract::extract_title(&page.body);
                ScrapeOutcome {
                    url: url.to_string(),
                    status: ScrapeStatus::Success,
                    content: Some(page.body),
                    title,
                    method: Some(ContentMode::Html),
                }
            }
        },
        Err(e) => {
            tracing::warn!("Scrape failed for {}: {}", url, e);
            ScrapeOutcome::failed(url)
        }
    }
}
