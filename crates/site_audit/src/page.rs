// Rust guideline compliant 2026-10-12

//! HTML inspection: meta tags, outbound links, visible text size.

use std::collections::{BTreeMap, HashSet};

use scraper::{ElementRef, Html};
use url::Url;

/// What the auditor needs from one HTML document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// `<meta name=... content=...>` pairs, names lowercased.
    pub meta_tags: BTreeMap<String, String>,
    /// Absolute http(s) targets of `<a href>`, de-duplicated, first-seen order.
    pub links: Vec<Url>,
    /// Number of characters of document text (script and style text included).
    pub text_chars: usize,
}

/// Parse `html`, resolving links against `base`.
///
/// A `<meta>` with an empty or missing `name` is ignored; a later tag with
/// the same name overwrites an earlier one. Links that fail to resolve or use
/// a scheme other than http/https (`mailto:`, `javascript:`) are dropped.
#[must_use]
pub fn parse_page(base: &Url, html: &str) -> ParsedPage {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut meta_tags = BTreeMap::new();
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    for element in root.descendants().filter_map(ElementRef::wrap) {
        let el = element.value();
        match el.name() {
            "meta" => {
                if let Some(name) = el.attr("name").filter(|n| !n.is_empty()) {
                    let content = el.attr("content").unwrap_or_default();
                    meta_tags.insert(name.to_lowercase(), content.to_owned());
                }
            }
            "a" => {
                let Some(href) = el.attr("href") else { continue };
                match base.join(href.trim()) {
                    Ok(url) if matches!(url.scheme(), "http" | "https") => {
                        if seen.insert(url.clone()) {
                            links.push(url);
                        }
                    }
                    Ok(url) => tracing::debug!(%url, "site_audit.link.skipped_scheme"),
                    Err(e) => tracing::debug!(href, error = %e, "site_audit.link.unresolvable"),
                }
            }
            _ => {}
        }
    }

    let text_chars = root.text().map(|t| t.chars().count()).sum();
    ParsedPage { meta_tags, links, text_chars }
}

/// Document text as a percentage of the raw HTML, by character count.
///
/// Returns `0.0` for an empty document.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "page sizes stay far below 2^52 characters"
)]
pub fn text_to_html_ratio(text_chars: usize, html_chars: usize) -> f64 {
    if html_chars == 0 {
        return 0.0;
    }
    text_chars as f64 / html_chars as f64 * 100.0
}
