use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use ef_core::Result;
use regex::Regex;
use tracing::info;

/// Matches a URL whose path is itself a full absolute URL, e.g.
/// `http://www.paulgraham.com/https://example.com/essay.html`. A handful of
/// index links are malformed this way.
static EMBEDDED_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/]+/(https?://.+)$").unwrap());

/// Retrieval seam for the pipeline. The HTTP implementation is swapped for
/// an in-memory one in tests.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Returns the raw response body for the given URL.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Strips the erroneous prefix from a link that embeds a second absolute URL,
/// leaving only the inner URL. Anything else passes through untouched.
pub fn correct_url(url: &str) -> String {
    match EMBEDDED_URL_RE.captures(url) {
        Some(caps) => {
            let inner = caps[1].to_string();
            info!("Corrected URL: {} -> {}", url, inner);
            inner
        }
        None => url.to_string(),
    }
}

/// Decodes a response body: strict UTF-8 first, Latin-1 on failure.
///
/// The fallback uses the WHATWG mapping of the ISO-8859-1 label
/// (windows-1252), which has no undefined byte sequences, so the second step
/// always yields text. Only transport can fail, never decoding.
pub fn decode_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Fetches one page and decodes its body.
pub async fn fetch_page(fetcher: &dyn Fetch, url: &str) -> Result<String> {
    let bytes = fetcher.fetch_bytes(url).await?;
    Ok(decode_body(&bytes))
}
