use crate::config::profile::ScraperProfile;
use crate::domain::model::FetchedPage;
use crate::domain::ports::PageFetcher;
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// HTTP client that tries not to look like a bot: rotating user agents,
/// randomized browser headers, optional proxy rotation and jittered delays
/// between attempts.
///
/// reqwest pins a proxy at client construction, so rotation is implemented
/// as one inner client per proxy, cycled round-robin.
pub struct StealthClient {
    clients: Vec<Client>,
    profile: ScraperProfile,
    cursor: AtomicUsize,
}

impl StealthClient {
    pub fn new(profile: ScraperProfile) -> Result<Self> {
        let mut clients = Vec::new();
        if profile.proxies.is_empty() {
            clients.push(build_client(&profile, None)?);
        } else {
            for proxy in &profile.proxies {
                clients.push(build_client(&profile, Some(proxy))?);
            }
        }

        Ok(Self {
            clients,
            profile,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(ScraperProfile::default())
    }

    pub fn profile(&self) -> &ScraperProfile {
        &self.profile
    }

    fn next_client(&self) -> &Client {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.clients.len();
        &self.clients[index]
    }

    fn random_headers(&self) -> HeaderMap {
        let mut rng = rand::rng();
        let mut headers = HeaderMap::new();

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
        headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("document"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("navigate"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("none"),
        );
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("max-age=0"),
        );

        if let Some(agent) = self.profile.user_agents.choose(&mut rng) {
            if let Ok(value) = HeaderValue::from_str(agent) {
                headers.insert(header::USER_AGENT, value);
            }
        }
        if let Some(language) = self.profile.accept_languages.choose(&mut rng) {
            if let Ok(value) = HeaderValue::from_str(language) {
                headers.insert(header::ACCEPT_LANGUAGE, value);
            }
        }
        // A referer only some of the time, like real navigation
        if rng.random_bool(0.5) {
            if let Some(referer) = self.profile.referers.choose(&mut rng) {
                if let Ok(value) = HeaderValue::from_str(referer) {
                    headers.insert(header::REFERER, value);
                }
            }
        }

        headers
    }

    /// Human-like pause: the configured rate limit plus jitter. A zero rate
    /// limit disables politeness delays entirely (used by tests and trusted
    /// targets).
    pub async fn human_delay(&self) {
        let secs = self.human_delay_secs();
        if secs > 0.0 {
            tokio::time::sleep(Duration::from_secs_f64(secs)).await;
        }
    }

    fn human_delay_secs(&self) -> f64 {
        if self.profile.rate_limit_secs <= 0.0 {
            return 0.0;
        }
        let mut rng = rand::rng();
        self.profile.rate_limit_secs + rng.random_range(0.5..3.0)
    }
}

#[async_trait]
impl PageFetcher for StealthClient {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        let max_retries = self.profile.max_retries.max(1);
        let mut last_err: Option<CheckError> = None;

        for attempt in 1..=max_retries {
            let client = self.next_client();
            let headers = self.random_headers();
            let started = Instant::now();

            match client.get(url).headers(headers).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await?;
                        tracing::debug!("Fetched {} ({} bytes)", url, body.len());
                        return Ok(FetchedPage {
                            url: url.to_string(),
                            status: status.as_u16(),
                            body,
                            fetch_time: started.elapsed(),
                        });
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        tracing::warn!(
                            "Rate limited for {} (attempt {}/{}), backing off",
                            url,
                            attempt,
                            max_retries
                        );
                        last_err = Some(CheckError::ProcessingError {
                            message: format!("HTTP 429 from {}", url),
                        });
                        sleep_uniform(self.profile.rate_limit_backoff_secs).await;
                        continue;
                    }

                    tracing::warn!(
                        "HTTP {} for {} (attempt {}/{})",
                        status.as_u16(),
                        url,
                        attempt,
                        max_retries
                    );
                    last_err = Some(CheckError::ProcessingError {
                        message: format!("HTTP {} from {}", status.as_u16(), url),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Request error for {} (attempt {}/{}): {}",
                        url,
                        attempt,
                        max_retries,
                        e
                    );
                    last_err = Some(e.into());
                    if attempt < max_retries {
                        sleep_uniform(self.profile.error_backoff_secs).await;
                        continue;
                    }
                }
            }

            if attempt < max_retries {
                self.human_delay().await;
            }
        }

        Err(last_err.unwrap_or_else(|| CheckError::ProcessingError {
            message: format!("Giving up on {} after {} attempts", url, max_retries),
        }))
    }

    async fn polite_delay(&self) {
        self.human_delay().await;
    }

    async fn head_status(&self, url: &str) -> Result<u16> {
        let response = self
            .next_client()
            .head(url)
            .timeout(Duration::from_secs(self.profile.head_timeout_secs))
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}

fn build_client(profile: &ScraperProfile, proxy: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(profile.request_timeout_secs));
    if let Some(proxy_url) = proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }
    Ok(builder.build()?)
}

async fn sleep_uniform(range_secs: [f64; 2]) {
    let secs = {
        let mut rng = rand::rng();
        if range_secs[1] > range_secs[0] {
            rng.random_range(range_secs[0]..range_secs[1])
        } else {
            range_secs[0]
        }
    };
    if secs > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }
}
