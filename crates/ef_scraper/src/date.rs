//! Best-effort publish date extraction.
//!
//! The site's pages carry no reliable date metadata, so this degrades
//! gracefully: meta tags first, then the "Month Year" phrase the essays
//! conventionally open with, then an empty string. Never an error.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

static MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b",
    )
    .unwrap()
});

const META_SELECTORS: &[&str] = &[
    "meta[property='article:published_time']",
    "meta[name='date']",
];

/// Returns a free-text date for the article, or an empty string.
pub fn extract_date(document: &Html, flow_text: &str) -> String {
    for selector in META_SELECTORS {
        let selector = Selector::parse(selector).unwrap();
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            let content = content.trim();
            if !content.is_empty() {
                return content.to_string();
            }
        }
    }
    MONTH_YEAR_RE
        .find(flow_text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
