//! Link extraction from anchor elements

use crate::url::canonical_form;
use scraper::{Html, Selector};
use url::Url;

/// Extracts every anchor `href` from an HTML body, resolved against `base_url`
///
/// # Rules
///
/// - One entry per `<a>` element carrying an `href`, in document order
/// - Relative references are resolved; absolute ones pass through
/// - Every link is returned in canonical form (see [`crate::url::normalize_url`])
/// - Anchors whose `href` cannot be resolved are skipped silently
/// - Repeated links are kept; deduplication belongs to the store
/// - An unparsable `base_url` yields no links
///
/// # Example
///
/// ```
/// use word_ripple::extract::extract_links;
///
/// let html = br#"<a href="/a">A</a><a>none</a><a href="https://other.test/">B</a>"#;
/// let links = extract_links(html, "https://example.com/page");
/// assert_eq!(links, vec!["https://example.com/a", "https://other.test"]);
/// ```
pub fn extract_links(html: &[u8], base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::debug!("Cannot resolve links against {}: {}", base_url, e);
            return Vec::new();
        }
    };

    let source = String::from_utf8_lossy(html);
    let document = Html::parse_document(&source);

    let mut links = Vec::new();
    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Ok(absolute_url) = base.join(href) {
                    links.push(canonical_form(absolute_url));
                }
            }
        }
    }

    links
}
