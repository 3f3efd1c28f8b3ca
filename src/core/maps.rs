use crate::core::audit::selector;
use crate::domain::model::Business;
use crate::domain::ports::PageFetcher;
use chrono::Utc;
use scraper::Html;
use std::sync::Arc;

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/";
const MAX_LISTINGS: usize = 10;

/// Extracts business listings from a Google Maps search results page.
///
/// Maps renders most content through JavaScript, so this parses whatever
/// listing markup survives in the static HTML. Zero results is a normal
/// outcome, not a failure.
pub struct MapsScraper<F: PageFetcher + 'static> {
    fetcher: Arc<F>,
}

impl<F: PageFetcher + 'static> MapsScraper<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        Self { fetcher }
    }

    pub async fn extract_business_info(&self, search_query: &str, location: &str) -> Vec<Business> {
        let query = format!("{} {}", search_query, location).trim().to_string();
        let search_url = format!("{}{}", MAPS_SEARCH_BASE, query.replace(' ', "+"));
        tracing::info!("Searching maps listings for: {}", query);

        match self.fetcher.fetch_page(&search_url).await {
            Ok(page) => parse_listings(&page.body, &query),
            Err(e) => {
                tracing::warn!("Maps search failed for \"{}\": {}", query, e);
                Vec::new()
            }
        }
    }
}

/// Parses listing blocks out of a results page. Exposed separately so the
/// selector logic is testable without HTTP.
pub fn parse_listings(html: &str, query: &str) -> Vec<Business> {
    let doc = Html::parse_document(html);
    let scraped_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut businesses = Vec::new();

    for listing in doc.select(&selector("div[data-cid]")).take(MAX_LISTINGS) {
        let name = listing
            .select(&selector("span.fontHeadlineSmall"))
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let rating = listing
            .select(&selector("span[aria-label]"))
            .next()
            .and_then(|el| el.value().attr("aria-label"))
            .unwrap_or("")
            .to_string();

        let address = listing
            .select(&selector("div.fontBodyMedium"))
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        businesses.push(Business {
            name,
            rating,
            address,
            search_query: query.to_string(),
            scraped_at: scraped_at.clone(),
        });
    }

    tracing::debug!("Parsed {} listings for \"{}\"", businesses.len(), query);
    businesses
}
