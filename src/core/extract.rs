use super::audit::selector;
use scraper::{ElementRef, Html};

/// Tags whose text is boilerplate rather than content.
const SKIP_TAGS: [&str; 8] = [
    "script", "style", "noscript", "nav", "header", "footer", "aside", "template",
];

/// Block-level tags treated as content units.
const BLOCK_TAGS: [&str; 10] = [
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre",
];

/// Pulls readable text out of a page, dropping scripts, styles and chrome.
/// Returns `None` when nothing readable remains.
pub fn extract_text(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let block_selector = selector("p, h1, h2, h3, h4, h5, h6, li, blockquote, pre");

    let mut blocks = Vec::new();
    for element in doc.select(&block_selector) {
        if has_ancestor_in(element, &SKIP_TAGS) {
            continue;
        }
        // Only the outermost block carries its nested text, so li > p does
        // not show up twice.
        if has_ancestor_in(element, &BLOCK_TAGS) {
            continue;
        }
        let text = element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            blocks.push(text);
        }
    }

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

/// The trimmed `<title>` text, if the page has one.
pub fn extract_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let title = doc
        .select(&selector("title"))
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())?;
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn has_ancestor_in(element: ElementRef<'_>, tags: &[&str]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| tags.contains(&ancestor.value().name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_paragraphs_and_headings() {
        let html = r#"<html><body>
            <h1>Welcome</h1>
            <p>First   paragraph
               with broken whitespace.</p>
            <p>Second paragraph.</p>
        </body></html>"#;
        let text = extract_text(html).unwrap();
        assert_eq!(
            text,
            "Welcome\n\nFirst paragraph with broken whitespace.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_skips_scripts_styles_and_chrome() {
        let html = r#"<html><body>
            <nav><li>Menu item</li></nav>
            <script>var x = "<p>not text</p>";</script>
            <style>p { color: red }</style>
            <footer><p>Copyright</p></footer>
            <p>Actual content.</p>
        </body></html>"#;
        assert_eq!(extract_text(html).unwrap(), "Actual content.");
    }

    #[test]
    fn test_nested_blocks_counted_once() {
        let html = "<html><body><ul><li>Item <p>with detail</p></li></ul></body></html>";
        assert_eq!(extract_text(html).unwrap(), "Item with detail");
    }

    #[test]
    fn test_empty_page_yields_none() {
        assert!(extract_text("<html><body><div>bare div text</div></body></html>").is_none());
        assert!(extract_text("").is_none());
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("<html><head><title> Hello </title></head></html>"),
            Some("Hello".to_string())
        );
        assert_eq!(extract_title("<html><head><title></title></head></html>"), None);
        assert_eq!(extract_title("<html></html>"), None);
    }
}
