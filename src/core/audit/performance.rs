use super::selector;
use crate::domain::model::{Issue, Severity};
use scraper::Html;
use std::time::Duration;

const SLOW_LOAD_SECS: f64 = 5.0;
const VERY_SLOW_LOAD_SECS: f64 = 10.0;
const LARGE_PAGE_KB: f64 = 500.0;
const VERY_LARGE_PAGE_KB: f64 = 1000.0;
const MAX_INLINE_STYLE_BLOCKS: usize = 2;

pub fn check(doc: &Html, page_size_bytes: usize, load_time: Duration) -> Vec<Issue> {
    let mut issues = Vec::new();

    let load_secs = load_time.as_secs_f64();
    if load_secs > SLOW_LOAD_SECS {
        issues.push(Issue {
            title: "Slow Page Load Time".to_string(),
            description: format!("Page took {:.2} seconds to load", load_secs),
            severity: if load_secs > VERY_SLOW_LOAD_SECS {
                Severity::Critical
            } else {
                Severity::Warning
            },
            location: "Page load".to_string(),
            suggestion: "Optimize images, reduce HTTP requests, and consider using a CDN"
                .to_string(),
        });
    }

    let page_kb = page_size_bytes as f64 / 1024.0;
    if page_kb > LARGE_PAGE_KB {
        issues.push(Issue {
            title: "Large Page Size".to_string(),
            description: format!("Page size is {:.1} KB", page_kb),
            severity: if page_kb < VERY_LARGE_PAGE_KB {
                Severity::Warning
            } else {
                Severity::Critical
            },
            location: "Page content".to_string(),
            suggestion: "Compress images, minify CSS/JS, and remove unnecessary content"
                .to_string(),
        });
    }

    for img in doc.select(&selector("img")) {
        let Some(src) = img.value().attr("src") else {
            continue;
        };
        if src.starts_with("data:") {
            continue;
        }
        let alt_missing = img.value().attr("alt").map(str::is_empty).unwrap_or(true);
        if alt_missing {
            issues.push(Issue {
                title: "Image Missing Alt Text".to_string(),
                description: "Image without alt attribute found".to_string(),
                severity: Severity::Warning,
                location: format!("Image: {}", src),
                suggestion: "Add descriptive alt text for accessibility and SEO".to_string(),
            });
        }
    }

    let style_blocks = doc.select(&selector("style")).count();
    if style_blocks > MAX_INLINE_STYLE_BLOCKS {
        issues.push(Issue {
            title: "Excessive Inline CSS".to_string(),
            description: format!("Found {} inline style tags", style_blocks),
            severity: Severity::Info,
            location: "Page head/body".to_string(),
            suggestion: "Move styles to external CSS files for better caching".to_string(),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_small_page_is_clean() {
        let doc = Html::parse_document("<html><body><p>hi</p></body></html>");
        assert!(check(&doc, 10_000, Duration::from_millis(300)).is_empty());
    }

    #[test]
    fn test_slow_load_severity_thresholds() {
        let doc = Html::parse_document("<html></html>");

        let issues = check(&doc, 100, Duration::from_secs_f64(6.0));
        assert_eq!(issues[0].title, "Slow Page Load Time");
        assert_eq!(issues[0].severity, Severity::Warning);

        let issues = check(&doc, 100, Duration::from_secs_f64(11.0));
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_page_size_thresholds() {
        let doc = Html::parse_document("<html></html>");

        let issues = check(&doc, 600 * 1024, Duration::from_millis(10));
        assert_eq!(issues[0].title, "Large Page Size");
        assert_eq!(issues[0].severity, Severity::Warning);

        let issues = check(&doc, 1200 * 1024, Duration::from_millis(10));
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn test_data_uri_images_are_ignored() {
        let html = r#"<html><body>
            <img src="data:image/png;base64,xyz">
            <img src="/logo.png">
        </body></html>"#;
        let doc = Html::parse_document(html);
        let issues = check(&doc, 100, Duration::from_millis(10));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location, "Image: /logo.png");
    }

    #[test]
    fn test_excessive_style_blocks() {
        let html = "<html><head><style>a{}</style><style>b{}</style><style>c{}</style></head></html>";
        let doc = Html::parse_document(html);
        let issues = check(&doc, 100, Duration::from_millis(10));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
        assert!(issues[0].description.contains("3"));
    }
}
