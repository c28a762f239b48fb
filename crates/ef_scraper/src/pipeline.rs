//! Per-run orchestration.
//!
//! One run fetches the index once, slices the newest window of entries and
//! processes them strictly sequentially with a politeness pause between
//! every article, success or failure. All run state lives in values created
//! here and dropped at the end; nothing persists across runs.

use std::time::Duration;

use ef_core::{ArticleRecord, ArticleRef, Error, Result};
use scraper::Html;
use tracing::{info, warn};
use url::Url;

use crate::convert;
use crate::date;
use crate::fetch::{self, Fetch};
use crate::footnotes;
use crate::index;
use crate::reflow;

/// Most articles the feed window may hold.
pub const MAX_WINDOW: usize = 10;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: Url,
    /// Index page listing every essay, relative to the base URL.
    pub index_page: String,
    /// How many of the newest articles to process.
    pub window: usize,
    /// Pause between article fetches.
    pub delay: Duration,
}

impl RunConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            index_page: "articles.html".to_string(),
            window: 5,
            delay: Duration::from_millis(50),
        }
    }
}

/// Article numbering for one run. Numbers are handed out per attempt, so a
/// failed article still consumes one; the gap shows in logs, never in the
/// feed.
#[derive(Debug, Default)]
struct RunContext {
    sequence: u32,
}

impl RunContext {
    fn next_article_no(&mut self) -> String {
        self.sequence += 1;
        format!("{:03}", self.sequence)
    }
}

/// Runs the full pipeline once: newest `window` entries, oldest of the batch
/// first. Index failure is fatal; a failed article is logged and skipped.
pub async fn run(fetcher: &dyn Fetch, config: &RunConfig) -> Result<Vec<ArticleRecord>> {
    info!("Fetching and updating articles...");
    let index_url = config
        .base_url
        .join(&config.index_page)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.index_page, e)))?;
    let bytes = fetcher
        .fetch_bytes(index_url.as_str())
        .await
        .map_err(|e| Error::Index(format!("failed to fetch {}: {}", index_url, e)))?;
    let html = fetch::decode_body(&bytes);

    let mut refs = index::extract_article_refs(&html, &config.base_url);
    info!("Found {} articles on the index page", refs.len());
    refs.reverse();
    let window = config.window.min(MAX_WINDOW);
    let batch = refs.split_off(refs.len().saturating_sub(window));

    let mut ctx = RunContext::default();
    let mut records = Vec::with_capacity(batch.len());
    for article in batch {
        let article_no = ctx.next_article_no();
        info!("Processing article {}: {}", article_no, article.url);
        match process_article(fetcher, &article, &article_no).await {
            Ok(record) => {
                info!("✅ {} {}", article_no, record.title);
                records.push(record);
            }
            Err(e) => {
                warn!("❌ {} {} ({})", article_no, article.title, e);
            }
        }
        // Mandatory pause between outbound requests; the origin server sees
        // the same pacing whether the article succeeded or not.
        tokio::time::sleep(config.delay).await;
    }
    info!("Finished run with {} records", records.len());
    Ok(records)
}

async fn process_article(
    fetcher: &dyn Fetch,
    article: &ArticleRef,
    article_no: &str,
) -> Result<ArticleRecord> {
    let url = fetch::correct_url(&article.url);
    let page = fetch::fetch_page(fetcher, &url).await?;
    Ok(build_record(article_no, &article.title, &url, &page))
}

/// Everything after the fetch is pure text transformation.
fn build_record(article_no: &str, title: &str, url: &str, page: &str) -> ArticleRecord {
    let document = Html::parse_document(page);
    let converted = convert::strip_index_backlink(&convert::flow_text(&document));
    let reflowed = reflow::reflow(&converted);
    let content = footnotes::link_footnotes(&reflowed, title);
    let date = date::extract_date(&document, &converted);
    ArticleRecord {
        article_no: article_no.to_string(),
        title: title.to_string(),
        date,
        url: url.to_string(),
        content,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;

    struct MockFetcher {
        pages: HashMap<String, Vec<u8>>,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
            }
        }

        fn page(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }
    }

    #[async_trait]
    impl Fetch for MockFetcher {
        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Scraping(format!("no page for {}", url)))
        }
    }

    fn test_config() -> RunConfig {
        let mut config = RunConfig::new(Url::parse("https://paulgraham.com/").unwrap());
        config.delay = Duration::from_millis(1);
        config
    }

    fn index_entry(href: &str, title: &str) -> String {
        format!(
            r#"<tr><td><img src="b.gif" width="10" height="10"><font size="2"><a href="{}">{}</a></font></td></tr>"#,
            href, title
        )
    }

    fn index_page(entries: &[String]) -> String {
        format!(
            "<html><body><table><tr><td><table>{}</table></td></tr></table></body></html>",
            entries.join("")
        )
    }

    fn essay_one() -> &'static str {
        r#"<html><head><title>Essay One</title></head><body>
<table><tr><td>
<a href="index.html"><img src="back.gif" width="69" height="23"></a><br><br>
<font size="2" face="verdana">March 2024<br><br>
This essay opens with a sentence that easily has more than five words. [1]
The wrapped prose continues across this second source line with enough words.<br><br>
<b>Notes</b><br><br>
[1] The note itself also runs long enough to be recognised as prose text.
</font></td></tr></table>
</body></html>"#
    }

    fn essay_two() -> Vec<u8> {
        // Latin-1 bytes: 0xE9 is é and is invalid as UTF-8.
        b"<html><head><title>Essay Two</title></head><body>
<table><tr><td>
<a href=\"index.html\"><img src=\"back.gif\" width=\"69\" height=\"23\"></a><br><br>
<font size=\"2\">February 2023<br><br>
The caf\xE9 anecdote needs enough words to count as regular prose here. [2]
A second wrapped line keeps the paragraph going with plenty of words.<br><br>
[2] Note text for the caf\xE9 anecdote, long enough to reflow as prose.
</font></td></tr></table>
</body></html>"
            .to_vec()
    }

    #[tokio::test]
    async fn end_to_end_two_articles() {
        let index = index_page(&[
            index_entry("one.html", "Essay One"),
            index_entry("two.html", "Essay Two"),
        ]);
        let fetcher = MockFetcher::new()
            .page("https://paulgraham.com/articles.html", index.as_bytes())
            .page("https://paulgraham.com/one.html", essay_one().as_bytes())
            .page("https://paulgraham.com/two.html", essay_two());

        let records = run(&fetcher, &test_config()).await.unwrap();

        assert_eq!(records.len(), 2);
        // The index lists newest first; the batch is processed oldest first.
        assert_eq!(records[0].article_no, "001");
        assert_eq!(records[0].title, "Essay Two");
        assert_eq!(records[1].article_no, "002");
        assert_eq!(records[1].title, "Essay One");

        // Latin-1 fallback decoded the second essay.
        assert!(records[0].content.contains("café"));

        // Exactly one forward link and one anchor per doubled marker.
        assert_eq!(
            records[0]
                .content
                .matches("[2](#essay_two_note2)")
                .count(),
            1
        );
        assert_eq!(
            records[0]
                .content
                .matches("<a name=essay_two_note2>[2]</a>")
                .count(),
            1
        );
        assert_eq!(
            records[1]
                .content
                .matches("[1](#essay_one_note1)")
                .count(),
            1
        );
        assert_eq!(
            records[1]
                .content
                .matches("<a name=essay_one_note1>[1]</a>")
                .count(),
            1
        );

        // The boilerplate back-link is gone.
        assert!(!records[0].content.contains("[](index.html)"));
        assert!(!records[1].content.contains("[](index.html)"));

        assert_eq!(records[0].date, "February 2023");
        assert_eq!(records[1].date, "March 2024");
    }

    #[tokio::test]
    async fn identical_inputs_yield_identical_records() {
        let index = index_page(&[
            index_entry("one.html", "Essay One"),
            index_entry("two.html", "Essay Two"),
        ]);
        let fetcher = MockFetcher::new()
            .page("https://paulgraham.com/articles.html", index.as_bytes())
            .page("https://paulgraham.com/one.html", essay_one().as_bytes())
            .page("https://paulgraham.com/two.html", essay_two());

        let config = test_config();
        let first = run(&fetcher, &config).await.unwrap();
        let second = run(&fetcher, &config).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn failed_article_is_skipped_but_consumes_a_number() {
        let index = index_page(&[
            index_entry("one.html", "Essay One"),
            index_entry("missing.html", "Gone Essay"),
        ]);
        let fetcher = MockFetcher::new()
            .page("https://paulgraham.com/articles.html", index.as_bytes())
            .page("https://paulgraham.com/one.html", essay_one().as_bytes());

        let records = run(&fetcher, &test_config()).await.unwrap();

        // "Gone Essay" was attempted first and took number 001 with it.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].article_no, "002");
        assert_eq!(records[0].title, "Essay One");
    }

    #[tokio::test]
    async fn index_failure_is_fatal() {
        let fetcher = MockFetcher::new();
        let result = run(&fetcher, &test_config()).await;
        assert!(matches!(result, Err(Error::Index(_))));
    }

    #[tokio::test]
    async fn window_bounds_the_batch_to_the_newest_articles() {
        let titles = ["A", "B", "C", "D", "E", "F", "G"];
        let entries: Vec<String> = titles
            .iter()
            .map(|t| index_entry(&format!("{}.html", t.to_lowercase()), t))
            .collect();
        let mut fetcher =
            MockFetcher::new().page("https://paulgraham.com/articles.html", index_page(&entries).as_bytes());
        for t in titles {
            fetcher = fetcher.page(
                &format!("https://paulgraham.com/{}.html", t.to_lowercase()),
                "<html><body>Some words form a tiny essay body right here.</body></html>".as_bytes(),
            );
        }

        let records = run(&fetcher, &test_config()).await.unwrap();

        // Newest five (A-E in document order), processed oldest first.
        let got: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(got, vec!["E", "D", "C", "B", "A"]);
        assert_eq!(records[0].article_no, "001");
        assert_eq!(records[4].article_no, "005");
    }

    #[tokio::test]
    async fn malformed_embedded_links_are_corrected_before_fetching() {
        let index = index_page(&[index_entry(
            "http://www.paulgraham.com/https://example.com/ext.html",
            "External Essay",
        )]);
        let fetcher = MockFetcher::new()
            .page("https://paulgraham.com/articles.html", index.as_bytes())
            .page(
                "https://example.com/ext.html",
                "<html><body>Hosted elsewhere but still part of the feed window.</body></html>"
                    .as_bytes(),
            );

        let records = run(&fetcher, &test_config()).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://example.com/ext.html");
    }
}
