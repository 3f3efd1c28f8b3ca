use super::selector;
use crate::domain::model::{Issue, Severity};
use scraper::Html;
use std::collections::HashSet;

/// Accessibility checks: alt text, labelled form controls, heading
/// structure, and a shallow inline-style contrast heuristic.
pub fn check(doc: &Html) -> Vec<Issue> {
    let mut issues = Vec::new();

    for img in doc.select(&selector("img")) {
        let alt_missing = img.value().attr("alt").map(str::is_empty).unwrap_or(true);
        if alt_missing {
            let src = img.value().attr("src").unwrap_or("unknown");
            issues.push(Issue {
                title: "Image Missing Alt Text".to_string(),
                description: "Image without alt attribute affects screen readers".to_string(),
                severity: Severity::Warning,
                location: format!("Image: {}", src),
                suggestion: "Add descriptive alt text: <img alt=\"description of image\">"
                    .to_string(),
            });
        }
    }

    // Ids come from the page, so membership is checked against a set rather
    // than interpolating them into a selector.
    let labelled_ids: HashSet<&str> = doc
        .select(&selector("label[for]"))
        .filter_map(|label| label.value().attr("for"))
        .collect();

    for control in doc.select(&selector("input, textarea, select")) {
        let input_type = control.value().attr("type").unwrap_or("text");
        if matches!(input_type, "hidden" | "submit" | "button") {
            continue;
        }
        let Some(id) = control.value().attr("id") else {
            continue;
        };
        if !labelled_ids.contains(id) {
            issues.push(Issue {
                title: "Form Input Without Label".to_string(),
                description: "Form input missing associated label".to_string(),
                severity: Severity::Warning,
                location: format!("Input ID: {}", id),
                suggestion: "Add a <label for=\"input-id\"> element or aria-label attribute"
                    .to_string(),
            });
        }
    }

    if doc.select(&selector("h1")).next().is_none() {
        issues.push(Issue {
            title: "Missing Main Heading (H1)".to_string(),
            description: "Page should have exactly one H1 heading".to_string(),
            severity: Severity::Warning,
            location: "Page structure".to_string(),
            suggestion: "Add one H1 tag that describes the main content of the page".to_string(),
        });
    }

    // Real contrast checking needs computed styles; this only flags inline
    // styles that set both foreground and background.
    for element in doc.select(&selector("[style]")) {
        let Some(style) = element.value().attr("style") else {
            continue;
        };
        if style.contains("color:") && style.contains("background") {
            issues.push(Issue {
                title: "Potential Color Contrast Issue".to_string(),
                description:
                    "Element has both color and background defined - check contrast ratio"
                        .to_string(),
                severity: Severity::Info,
                location: format!("Element: {}", element.value().name()),
                suggestion:
                    "Ensure color contrast ratio meets WCAG guidelines (4.5:1 for normal text)"
                        .to_string(),
            });
        }
    }

    issues
}
