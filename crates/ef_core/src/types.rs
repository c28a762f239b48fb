use serde::{Deserialize, Serialize};

/// A single entry discovered on the essay index page.
///
/// Entries are produced in document order; the pipeline decides which slice
/// of them to process and in what order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRef {
    pub title: String,
    pub url: String,
}

/// One fully processed essay, as it appears in the published feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// 1-based position within the run, zero-padded to three digits.
    /// Failed articles consume a number too, so gaps can appear in logs
    /// without ever showing up in the feed itself.
    pub article_no: String,
    pub title: String,
    /// Best-effort publish date as free text. May be empty, and is not
    /// guaranteed to parse as a calendar date.
    pub date: String,
    pub url: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_expected_field_names() {
        let record = ArticleRecord {
            article_no: "001".to_string(),
            title: "Test".to_string(),
            date: "March 2024".to_string(),
            url: "https://example.com/test.html".to_string(),
            content: "Body".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["article_no"], "001");
        assert_eq!(json["title"], "Test");
        assert_eq!(json["date"], "March 2024");
        assert_eq!(json["url"], "https://example.com/test.html");
        assert_eq!(json["content"], "Body");
    }
}
