//! HTML content extraction
//!
//! Pure functions that turn a fetched body into the two things the crawl
//! needs: outbound links to consider and plain text to index.

use scraper::{Html, Selector};
use url::Url;

/// Links and text pulled out of one HTML document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContent {
    /// Absolute URLs in document order (duplicates preserved)
    pub links: Vec<String>,

    /// Visible text tokens joined by single spaces
    pub text: String,
}

/// Parses `body` once and extracts both links and text
pub fn extract_content(base_url: &str, body: &str) -> ExtractedContent {
    let document = Html::parse_document(body);

    ExtractedContent {
        links: links_from_document(&document, base_url),
        text: text_from_document(&document),
    }
}

/// Extracts every `<a href>` target as an absolute URL
///
/// # Link Rules
///
/// - Relative links are resolved against `base_url`
/// - A malformed `base_url` yields no links at all
/// - Fragment-only, `javascript:`, `mailto:`, `tel:` and `data:` links are dropped
/// - Only HTTP(S) results are kept, with any fragment removed
///
/// # Example
///
/// ```
/// use sumi_index::crawler::extract_links;
///
/// let html = r#"<a href="/about">About</a><a href="javascript:void(0)">x</a>"#;
/// let links = extract_links("https://go.dev/blog/", html);
/// assert_eq!(links, vec!["https://go.dev/about"]);
/// ```
pub fn extract_links(base_url: &str, body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    links_from_document(&document, base_url)
}

/// Concatenates the document's text nodes
///
/// Script and style contents are not excluded.
pub fn extract_text(body: &str) -> String {
    let document = Html::parse_document(body);
    text_from_document(&document)
}

fn links_from_document(document: &Html, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot resolve links against {}: {}", base_url, e);
            return Vec::new();
        }
    };

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, &base))
        .collect()
}

fn text_from_document(document: &Html) -> String {
    let mut text = String::new();

    for chunk in document.root_element().text() {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(chunk);
    }

    text
}

/// Resolves a link href to an absolute URL
///
/// Stricter than a plain `Url::join`: `mailto:`, `tel:`, `data:`,
/// `javascript:` and any other non-HTTP(S) targets are dropped, and the
/// fragment is stripped, so `https://x/#top` and `https://x/` resolve to the
/// same page.
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url.to_string())
}
