use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How bad an individual finding is. Mirrors the severity buckets used in
/// report summaries: critical issues break the page, warnings degrade it,
/// info entries are advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(name)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Html,
    Links,
    Performance,
    Accessibility,
    Seo,
    Javascript,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Html,
        Category::Links,
        Category::Performance,
        Category::Accessibility,
        Category::Seo,
        Category::Javascript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Html => "html",
            Category::Links => "links",
            Category::Performance => "performance",
            Category::Accessibility => "accessibility",
            Category::Seo => "seo",
            Category::Javascript => "javascript",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Category::Html),
            "links" => Ok(Category::Links),
            "performance" => Ok(Category::Performance),
            "accessibility" => Ok(Category::Accessibility),
            "seo" => Ok(Category::Seo),
            "javascript" => Ok(Category::Javascript),
            other => Err(format!("unknown check category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub location: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub warnings: usize,
    pub info: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub url: String,
    pub timestamp: String,
    pub summary: Summary,
    pub categories: BTreeMap<Category, Vec<Issue>>,
}

impl AuditReport {
    pub fn new(url: &str) -> Self {
        let mut categories = BTreeMap::new();
        for category in Category::ALL {
            categories.insert(category, Vec::new());
        }
        Self {
            url: url.to_string(),
            timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            summary: Summary::default(),
            categories,
        }
    }

    pub fn set_issues(&mut self, category: Category, issues: Vec<Issue>) {
        self.categories.insert(category, issues);
    }

    pub fn push_issue(&mut self, category: Category, issue: Issue) {
        self.categories.entry(category).or_default().push(issue);
    }

    /// Recounts the summary from the issue lists. Called after every
    /// mutation so that `summary.total` always equals the issue count.
    pub fn recompute_summary(&mut self) {
        let mut summary = Summary::default();
        for issues in self.categories.values() {
            for issue in issues {
                summary.total += 1;
                match issue.severity {
                    Severity::Critical => summary.critical += 1,
                    Severity::Warning => summary.warnings += 1,
                    Severity::Info => summary.info += 1,
                }
            }
        }
        self.summary = summary;
    }
}

/// Which check categories an audit run should execute.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CheckSelection {
    #[serde(default)]
    pub html: bool,
    #[serde(default)]
    pub links: bool,
    #[serde(default)]
    pub performance: bool,
    #[serde(default)]
    pub accessibility: bool,
    #[serde(default)]
    pub seo: bool,
    #[serde(default)]
    pub javascript: bool,
}

impl CheckSelection {
    pub fn all() -> Self {
        Self {
            html: true,
            links: true,
            performance: true,
            accessibility: true,
            seo: true,
            javascript: true,
        }
    }

    pub fn from_categories(categories: &[Category]) -> Self {
        let mut selection = Self::default();
        for category in categories {
            selection.enable(*category);
        }
        selection
    }

    pub fn enable(&mut self, category: Category) {
        match category {
            Category::Html => self.html = true,
            Category::Links => self.links = true,
            Category::Performance => self.performance = true,
            Category::Accessibility => self.accessibility = true,
            Category::Seo => self.seo = true,
            Category::Javascript => self.javascript = true,
        }
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Html => self.html,
            Category::Links => self.links,
            Category::Performance => self.performance,
            Category::Accessibility => self.accessibility,
            Category::Seo => self.seo,
            Category::Javascript => self.javascript,
        }
    }

    pub fn any(&self) -> bool {
        Category::ALL.iter().any(|c| self.is_enabled(*c))
    }
}

/// A page fetched through the anti-detection client.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
    pub fetch_time: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Keep the raw HTML and pull out the document title.
    Html,
    /// Strip boilerplate and return readable text only.
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub url: String,
    pub status: ScrapeStatus,
    pub content: Option<String>,
    pub title: Option<String>,
    pub method: Option<ContentMode>,
}

impl ScrapeOutcome {
    pub fn failed(url: &str) -> Self {
        Self {
            url: url.to_string(),
            status: ScrapeStatus::Failed,
            content: None,
            title: None,
            method: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    pub rating: String,
    pub address: String,
    pub search_query: String,
    pub scraped_at: String,
}
