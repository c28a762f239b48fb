//! HTML to flow-text conversion.
//!
//! Tuned to the target site's markup: table-based layout, `<font>` wrappers,
//! paragraphs separated by doubled `<br>` tags. Inline markup is simplified
//! to lightweight markers, images are dropped entirely, and table structure
//! contributes only block boundaries while its content flows through.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Column at which paragraph text wraps.
const WRAP_WIDTH: usize = 78;

/// The converted form of the site's image-link back to the index page. It
/// shows up as the first block of nearly every essay.
pub const INDEX_BACKLINK: &str = "[](index.html)\n\n";

/// Converts one article's document to flow text: wrapped paragraphs
/// separated by blank lines, bold/italic/code markers, links collected
/// reference-style with their targets listed at the end.
pub fn flow_text(document: &Html) -> String {
    let mut converter = Converter::default();
    converter.element(document.root_element());
    converter.finish()
}

/// Removes the boilerplate index back-link if present; absence is fine.
pub fn strip_index_backlink(text: &str) -> String {
    text.replacen(INDEX_BACKLINK, "", 1)
}

#[derive(Default)]
struct Converter {
    out: String,
    para: String,
    references: Vec<String>,
}

impl Converter {
    fn element(&mut self, element: ElementRef) {
        match element.value().name() {
            "script" | "style" | "head" | "img" => {}
            "br" => self.line_break(),
            "p" | "blockquote" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "div" | "table"
            | "tr" | "li" | "ul" | "ol" | "hr" => {
                self.flush();
                self.children(element);
                self.flush();
            }
            "b" | "strong" => self.marked(element, "**"),
            "i" | "em" => self.marked(element, "*"),
            "code" | "tt" | "pre" => self.marked(element, "`"),
            "a" => self.link(element),
            _ => self.children(element),
        }
    }

    fn children(&mut self, element: ElementRef) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.text(text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.element(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                if !self.para.is_empty()
                    && !self.para.ends_with(' ')
                    && !self.para.ends_with('\n')
                {
                    self.para.push(' ');
                }
            } else {
                self.para.push(ch);
            }
        }
    }

    fn marked(&mut self, element: ElementRef, marker: &str) {
        let start = self.para.len();
        self.children(element);
        if self.para.len() > start {
            self.para.insert_str(start, marker);
            self.para.push_str(marker);
        }
    }

    fn link(&mut self, element: ElementRef) {
        let href = match element.value().attr("href") {
            Some(href) => href.to_string(),
            None => return self.children(element),
        };
        let start = self.para.len();
        self.children(element);
        if self.para[start..].trim().is_empty() {
            // An image-only link: the image is gone, keep the target inline.
            self.para.truncate(start);
            self.para.push_str(&format!("[]({})", href));
        } else {
            self.references.push(href);
            self.para.insert(start, '[');
            self.para.push_str(&format!("][{}]", self.references.len()));
        }
    }

    /// A single `<br>` breaks the line; a second in a row ends the paragraph.
    fn line_break(&mut self) {
        if self.para.trim().is_empty() || self.para.ends_with('\n') {
            self.flush();
        } else {
            self.para.push('\n');
        }
    }

    fn flush(&mut self) {
        let para = std::mem::take(&mut self.para);
        let trimmed = para.trim();
        if trimmed.is_empty() {
            return;
        }
        for line in trimmed.split('\n') {
            let wrapped = wrap(line.trim(), WRAP_WIDTH);
            if !wrapped.is_empty() {
                self.out.push_str(&wrapped);
                self.out.push('\n');
            }
        }
        self.out.push('\n');
    }

    fn finish(mut self) -> String {
        self.flush();
        let references = std::mem::take(&mut self.references);
        if !references.is_empty() {
            for (i, target) in references.iter().enumerate() {
                self.out.push_str(&format!("   [{}]: {}\n", i + 1, target));
            }
            self.out.push('\n');
        }
        self.out
    }
}

fn wrap(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for word in line.split_whitespace() {
        let len = word.chars().count();
        if column == 0 {
            out.push_str(word);
            column = len;
        } else if column + 1 + len <= width {
            out.push(' ');
            out.push_str(word);
            column += 1 + len;
        } else {
            out.push('\n');
            out.push_str(word);
            column = len;
        }
    }
    out
}
