use super::selector;
use crate::domain::model::{Issue, Severity};
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

const MAX_INLINE_SCRIPTS: usize = 3;

fn eval_call_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Bare eval calls only; window.myEvaluator( must not match
    RE.get_or_init(|| Regex::new(r"(?:^|[^\w.])eval\s*\(").expect("invalid regex literal"))
}

/// Static JavaScript hygiene checks over inline and external script tags.
/// External script bodies are never fetched.
pub fn check(doc: &Html) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut inline_scripts = Vec::new();
    let mut external_scripts = 0usize;
    for script in doc.select(&selector("script")) {
        if script.value().attr("src").is_some() {
            external_scripts += 1;
            continue;
        }
        let body = script.text().collect::<String>();
        if !body.trim().is_empty() {
            inline_scripts.push(body);
        }
    }

    if inline_scripts.len() > MAX_INLINE_SCRIPTS {
        issues.push(Issue {
            title: "Excessive Inline JavaScript".to_string(),
            description: format!("Found {} inline script blocks", inline_scripts.len()),
            severity: Severity::Info,
            location: "Page scripts".to_string(),
            suggestion: "Move JavaScript to external files for better organization and caching"
                .to_string(),
        });
    }

    for body in &inline_scripts {
        if body.contains("console.log") {
            issues.push(Issue {
                title: "Debug Code in Production".to_string(),
                description: "console.log statements found in JavaScript".to_string(),
                severity: Severity::Info,
                location: "Inline JavaScript".to_string(),
                suggestion: "Remove console.log statements from production code".to_string(),
            });
        }
        if eval_call_regex().is_match(body) {
            issues.push(Issue {
                title: "Unsafe eval() Usage".to_string(),
                description: "eval() function usage detected".to_string(),
                severity: Severity::Critical,
                location: "JavaScript code".to_string(),
                suggestion: "Avoid using eval() as it poses security risks".to_string(),
            });
        }
    }

    if external_scripts > 0 {
        issues.push(Issue {
            title: "External JavaScript Files".to_string(),
            description: format!("Found {} external JavaScript files", external_scripts),
            severity: Severity::Info,
            location: "External scripts".to_string(),
            suggestion: "Ensure external scripts have proper error handling and loading strategies"
                .to_string(),
        });
    }

    issues
}
