use crate::domain::model::FetchedPage;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Where exported artifacts live. Kept minimal so tests can swap in an
/// in-memory implementation.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn list_files(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn target_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn max_link_checks(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
}

/// Seam between the audit/scrape engines and the HTTP layer. The production
/// implementation is `StealthClient`; tests point it at an httpmock server.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page body, applying whatever retry and disguise policy the
    /// implementation carries.
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage>;

    /// Cheap reachability probe used by the broken-link sweep.
    async fn head_status(&self, url: &str) -> Result<u16>;

    /// Politeness pause between bulk requests. Implementations without a
    /// rate limit can keep the no-op default.
    async fn polite_delay(&self) {}
}
