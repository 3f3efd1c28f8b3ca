pub mod audit;
pub mod client;
pub mod extract;
pub mod maps;
pub mod scrape;

pub use crate::domain::model::{
    AuditReport, Business, Category, CheckSelection, ContentMode, FetchedPage, Issue,
    ScrapeOutcome, ScrapeStatus, Severity, Summary,
};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Storage};
pub use crate::utils::error::Result;
