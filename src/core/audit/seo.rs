use super::selector;
use crate::domain::model::{Issue, Severity};
use scraper::Html;

const MIN_TITLE_CHARS: usize = 10;
const MAX_TITLE_CHARS: usize = 70;
const MAX_DESCRIPTION_CHARS: usize = 160;

pub fn check(doc: &Html) -> Vec<Issue> {
    let mut issues = Vec::new();

    if let Some(title) = doc.select(&selector("title")).next() {
        let text = title.text().collect::<String>().trim().to_string();
        let len = text.chars().count();
        if len < MIN_TITLE_CHARS {
            issues.push(Issue {
                title: "Title Too Short".to_string(),
                description: format!("Title is only {} characters", len),
                severity: Severity::Warning,
                location: "<title> tag".to_string(),
                suggestion: "Make title 50-60 characters for optimal SEO".to_string(),
            });
        } else if len > MAX_TITLE_CHARS {
            issues.push(Issue {
                title: "Title Too Long".to_string(),
                description: format!("Title is {} characters", len),
                severity: Severity::Warning,
                location: "<title> tag".to_string(),
                suggestion:
                    "Keep title under 60 characters to prevent truncation in search results"
                        .to_string(),
            });
        }
    }

    match doc
        .select(&selector("meta[name=\"description\"]"))
        .next()
        .and_then(|el| el.value().attr("content"))
    {
        None => {
            issues.push(Issue {
                title: "Missing Meta Description".to_string(),
                description: "No meta description found".to_string(),
                severity: Severity::Warning,
                location: "<head> section".to_string(),
                suggestion:
                    "Add <meta name=\"description\" content=\"page description\"> for better SEO"
                        .to_string(),
            });
        }
        Some(content) => {
            let len = content.chars().count();
            if len > MAX_DESCRIPTION_CHARS {
                issues.push(Issue {
                    title: "Meta Description Too Long".to_string(),
                    description: format!("Meta description is {} characters", len),
                    severity: Severity::Info,
                    location: "Meta description".to_string(),
                    suggestion: "Keep meta description under 160 characters".to_string(),
                });
            }
        }
    }

    if doc
        .select(&selector("meta[name=\"keywords\"]"))
        .next()
        .is_some()
    {
        issues.push(Issue {
            title: "Outdated Meta Keywords".to_string(),
            description: "Meta keywords tag is no longer used by search engines".to_string(),
            severity: Severity::Info,
            location: "Meta keywords".to_string(),
            suggestion: "Remove meta keywords tag as it's no longer relevant for SEO".to_string(),
        });
    }

    let og_title = doc
        .select(&selector("meta[property=\"og:title\"]"))
        .next()
        .is_some();
    let og_description = doc
        .select(&selector("meta[property=\"og:description\"]"))
        .next()
        .is_some();
    if !og_title || !og_description {
        issues.push(Issue {
            title: "Missing Open Graph Tags".to_string(),
            description: "Missing og:title or og:description for social media sharing"
                .to_string(),
            severity: Severity::Info,
            location: "<head> section".to_string(),
            suggestion: "Add Open Graph meta tags for better social media preview".to_string(),
        });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_well_formed_head_is_clean() {
        let html = r#"<html><head>
            <title>A perfectly reasonable page title</title>
            <meta name="description" content="Short and sweet description.">
            <meta property="og:title" content="t">
            <meta property="og:description" content="d">
        </head></html>"#;
        let doc = Html::parse_document(html);
        assert!(check(&doc).is_empty());
    }

    #[test]
    fn test_short_title_flagged() {
        let html = r#"<html><head><title>Hi</title>
            <meta name="description" content="d">
            <meta property="og:title" content="t">
            <meta property="og:description" content="d">
        </head></html>"#;
        let doc = Html::parse_document(html);
        let issues = check(&doc);
        assert_eq!(titles(&issues), vec!["Title Too Short"]);
        assert!(issues[0].description.contains("2 characters"));
    }

    #[test]
    fn test_long_title_flagged() {
        let long_title = "x".repeat(80);
        let html = format!(
            r#"<html><head><title>{}</title>
            <meta name="description" content="d">
            <meta property="og:title" content="t">
            <meta property="og:description" content="d">
            </head></html>"#,
            long_title
        );
        let doc = Html::parse_document(&html);
        assert_eq!(titles(&check(&doc)), vec!["Title Too Long"]);
    }

    #[test]
    fn test_missing_description_and_og_tags() {
        let html = "<html><head><title>A reasonable title here</title></head></html>";
        let doc = Html::parse_document(html);
        let issues = check(&doc);
        let titles = titles(&issues);
        assert!(titles.contains(&"Missing Meta Description"));
        assert!(titles.contains(&"Missing Open Graph Tags"));
    }

    #[test]
    fn test_overlong_description_is_info() {
        let description = "d".repeat(200);
        let html = format!(
            r#"<html><head><title>A reasonable title here</title>
            <meta name="description" content="{}">
            <meta property="og:title" content="t">
            <meta property="og:description" content="d">
            </head></html>"#,
            description
        );
        let doc = Html::parse_document(&html);
        let issues = check(&doc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn test_meta_keywords_is_outdated() {
        let html = r#"<html><head><title>A reasonable title here</title>
            <meta name="description" content="d">
            <meta name="keywords" content="a,b">
            <meta property="og:title" content="t">
            <meta property="og:description" content="d">
        </head></html>"#;
        let doc = Html::parse_document(html);
        assert_eq!(titles(&check(&doc)), vec!["Outdated Meta Keywords"]);
    }
}
