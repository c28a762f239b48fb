use ef_core::{ArticleRecord, Result};

/// Renders the feed as a JSON array of records.
pub fn render(records: &[ArticleRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}
