//! HTML extractor for the structured document
//!
//! This module turns a page's HTML into a `ScrapedDocument`:
//! - Page title (from `<head><title>`)
//! - Headings `h1`–`h6` and paragraphs, empty ones dropped
//! - Every `<a href>` with its link text, empty text kept

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Structured content extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedDocument {
    pub title: String,
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    pub links: Vec<ScrapedLink>,
}

/// An anchor found on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedLink {
    /// The raw `href` attribute, not resolved against the page URL
    pub href: String,
    pub text: String,
}

/// Extracts the structured document from HTML
///
/// Never fails: malformed markup is repaired by the HTML5 parser, and anything
/// that cannot be found yields an empty field.
///
/// # Extraction Rules
///
/// - `title`: trimmed text of the first `head > title`, empty if absent
/// - `headings`: trimmed text of each `h1`–`h6` in document order, skipping empty ones
/// - `paragraphs`: same rule for `p`
/// - `links`: each `a[href]` in document order as `{href, text}`; links with
///   empty text are kept
///
/// # Example
///
/// ```
/// use scrape_sentry::pipeline::extract;
///
/// let doc = extract(r#"<h1>Heading</h1><p>Paragraph</p><a href="https://example.com">Link</a>"#);
/// assert_eq!(doc.title, "");
/// assert_eq!(doc.headings, vec!["Heading"]);
/// assert_eq!(doc.links[0].href, "https://example.com");
/// ```
pub fn extract(html: &str) -> ScrapedDocument {
    let document = Html::parse_document(html);

    ScrapedDocument {
        title: extract_title(&document),
        headings: extract_texts(&document, "h1, h2, h3, h4, h5, h6"),
        paragraphs: extract_texts(&document, "p"),
        links: extract_links(&document),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn extract_title(document: &Html) -> String {
    if let Ok(title_selector) = Selector::parse("head > title") {
        if let Some(element) = document.select(&title_selector).next() {
            return element_text(element);
        }
    }
    String::new()
}

/// Trimmed, non-empty text of every element matching `css`, in document order
fn extract_texts(document: &Html, css: &str) -> Vec<String> {
    match Selector::parse(css) {
        Ok(selector) => document
            .select(&selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn extract_links(document: &Html) -> Vec<ScrapedLink> {
    match Selector::parse("a[href]") {
        Ok(a_selector) => document
            .select(&a_selector)
            .map(|element| ScrapedLink {
                href: element.value().attr("href").unwrap_or_default().to_string(),
                text: element_text(element),
            })
            .collect(),
        Err(_) => Vec::new(),
    }
}
