//! Footnote marker rewriting.
//!
//! Essays cite footnotes as bracketed numbers that appear exactly twice:
//! once where the note is referenced and once where it is defined. The
//! first occurrence becomes a link to the definition and the second becomes
//! the named anchor it points to. Occurrence counts are scoped to a single
//! call; nothing leaks between articles.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(\d+)\]").unwrap());

/// Rewrites bracketed numeric markers into forward link / anchor pairs.
///
/// Anchors are named `<slug>_note<number>` from the article title's slug.
/// Markers are counted by their literal bracketed text, so `[01]` and `[1]`
/// are independent. A number seen only once leaves an orphan forward link;
/// a third or later occurrence stays a literal bracketed number, since the
/// site's convention is one citation site plus one definition site.
pub fn link_footnotes(text: &str, title: &str) -> String {
    let slug = slugify(title);
    let mut occurrences: HashMap<String, u32> = HashMap::new();
    MARKER_RE
        .replace_all(text, |caps: &Captures| {
            let number = &caps[1];
            let count = occurrences.entry(caps[0].to_string()).or_insert(0);
            *count += 1;
            match *count {
                1 => format!("[{}](#{}_note{})", number, slug, number),
                2 => format!("<a name={}_note{}>[{}]</a>", slug, number, number),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Lowercases the title, collapses whitespace runs to single underscores and
/// drops every other non-alphanumeric character.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for ch in title.to_lowercase().chars() {
        if ch.is_whitespace() {
            pending_separator = !slug.is_empty();
        } else if ch.is_alphanumeric() || ch == '_' {
            if pending_separator {
                slug.push('_');
                pending_separator = false;
            }
            slug.push(ch);
        }
    }
    slug
}
