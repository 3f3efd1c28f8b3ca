use super::selector;
use crate::domain::model::{Issue, Severity};
use scraper::Html;
use std::collections::HashSet;

/// Structural HTML problems: missing DOCTYPE, title, charset, viewport,
/// duplicated element ids.
pub fn check(doc: &Html, raw_body: &str) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !raw_body
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("<!doctype")
    {
        issues.push(Issue {
            title: "Missing DOCTYPE Declaration".to_string(),
            description: "The HTML document is missing a DOCTYPE declaration".to_string(),
            severity: Severity::Warning,
            location: "Document start".to_string(),
            suggestion: "Add <!DOCTYPE html> at the beginning of your HTML document".to_string(),
        });
    }

    let title_text = doc
        .select(&selector("title"))
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string());
    if title_text.map(|t| t.is_empty()).unwrap_or(true) {
        issues.push(Issue {
            title: "Missing or Empty Title".to_string(),
            description: "The page is missing a title tag or it's empty".to_string(),
            severity: Severity::Critical,
            location: "<head> section".to_string(),
            suggestion: "Add a descriptive <title> tag in the <head> section".to_string(),
        });
    }

    if doc.select(&selector("meta[charset]")).next().is_none() {
        issues.push(Issue {
            title: "Missing Character Set Declaration".to_string(),
            description: "No charset meta tag found".to_string(),
            severity: Severity::Warning,
            location: "<head> section".to_string(),
            suggestion: "Add <meta charset=\"UTF-8\"> in the <head> section".to_string(),
        });
    }

    if doc
        .select(&selector("meta[name=\"viewport\"]"))
        .next()
        .is_none()
    {
        issues.push(Issue {
            title: "Missing Viewport Meta Tag".to_string(),
            description: "No viewport meta tag found for mobile responsiveness".to_string(),
            severity: Severity::Warning,
            location: "<head> section".to_string(),
            suggestion:
                "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
                    .to_string(),
        });
    }

    let mut seen_ids = HashSet::new();
    for element in doc.select(&selector("[id]")) {
        let Some(id) = element.value().attr("id") else {
            continue;
        };
        if id.is_empty() {
            continue;
        }
        if !seen_ids.insert(id.to_string()) {
            issues.push(Issue {
                title: "Duplicate ID Attribute".to_string(),
                description: format!("ID \"{}\" is used more than once", id),
                severity: Severity::Critical,
                location: format!("ID: {}", id),
                suggestion: "Ensure all ID attributes are unique on the page".to_string(),
            });
        }
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
    fn test_clean_page_has_no_issues() {
        let html = r#"<!DOCTYPE html><html><head><meta charset="utf-8">
            <meta name="viewport" content="width=device-width">
            <title>Fine page</title></head><body></body></html>"#;
        let doc = Html::parse_document(html);
        assert!(check(&doc, html).is_empty());
    }

    #[test]
    fn test_missing_doctype_and_title() {
        let html = "<html><head></head><body></body></html>";
        let doc = Html::parse_document(html);
        let issues = check(&doc, html);
        let titles = titles(&issues);
        assert!(titles.contains(&"Missing DOCTYPE Declaration"));
        assert!(titles.contains(&"Missing or Empty Title"));
        assert!(titles.contains(&"Missing Character Set Declaration"));
        assert!(titles.contains(&"Missing Viewport Meta Tag"));
    }

    #[test]
    fn test_empty_title_is_critical() {
        let html = "<!DOCTYPE html><html><head><title>  </title></head></html>";
        let doc = Html::parse_document(html);
        let issues = check(&doc, html);
        let title_issue = issues
            .iter()
            .find(|i| i.title == "Missing or Empty Title")
            .unwrap();
        assert_eq!(title_issue.severity, Severity::Critical);
    }

    #[test]
    fn test_duplicate_ids_reported_per_repeat() {
        let html = r#"<!DOCTYPE html><html><head><meta charset="utf-8">
            <meta name="viewport" content="w"><title>t</title></head>
            <body><div id="a"></div><span id="a"></span><p id="a"></p>
            <em id="b"></em></body></html>"#;
        let doc = Html::parse_document(html);
        let issues = check(&doc, html);
        let dupes: Vec<_> = issues
            .iter()
            .filter(|i| i.title == "Duplicate ID Attribute")
            .collect();
        assert_eq!(dupes.len(), 2);
        assert!(dupes.iter().all(|i| i.location == "ID: a"));
    }

    #[test]
    fn test_lowercase_doctype_is_accepted() {
        let html = "<!doctype html><html><head><meta charset=\"utf-8\"><meta name=\"viewport\" content=\"w\"><title>t</title></head></html>";
        let doc = Html::parse_document(html);
        assert!(check(&doc, html).is_empty());
    }
}
