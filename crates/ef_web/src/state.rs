use ef_core::ArticleRecord;
use tokio::sync::RwLock;

/// Shared between the HTTP handlers and the background rescrape loop. The
/// scraper replaces the whole feed at the end of a successful run; readers
/// always see a complete run's output, never a partial one.
#[derive(Default)]
pub struct AppState {
    feed: RwLock<Vec<ArticleRecord>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn replace_feed(&self, records: Vec<ArticleRecord>) {
        *self.feed.write().await = records;
    }

    pub async fn feed(&self) -> Vec<ArticleRecord> {
        self.feed.read().await.clone()
    }
}
