//! Deal page fetching and content-region extraction.
//!
//! Page failures are common (dead links, bot walls, layout changes) and never
//! abort a harvest: `fetch_content` turns every failure into
//! `PageContent::Unavailable`, which reads as empty text downstream.

pub mod deal;

pub use deal::ScrapedDeal;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::ingest::normalize::strip_tags;
use crate::metrics::PAGES_UNAVAILABLE_TOTAL;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; deal-scanner/0.1)";

/// Removed from the flattened region text before newlines are folded.
const MORE_MARKER: &str = "\nmore";

static CONTENT_SECTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.content-section").expect("content selector"));

/// Retrieves a page body as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// `PageFetcher` over a shared reqwest client.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

/// Why a page yielded no content.
#[derive(Debug)]
pub enum Unavailable {
    Fetch(FetchError),
    MissingRegion,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::Fetch(e) => write!(f, "fetch failed: {e}"),
            Unavailable::MissingRegion => f.write_str("no content-section region"),
        }
    }
}

/// Outcome of a best-effort page fetch.
#[derive(Debug)]
pub enum PageContent {
    Available(String),
    Unavailable(Unavailable),
}

impl PageContent {
    /// Collapse to text; unavailable pages read as empty.
    pub fn into_text(self) -> String {
        match self {
            PageContent::Available(text) => text,
            PageContent::Unavailable(_) => String::new(),
        }
    }
}

/// Fetch `url` and return its flattened content region. Never fails.
pub async fn fetch_content(fetcher: &dyn PageFetcher, url: &str) -> PageContent {
    let outcome = match fetcher.get(url).await {
        Ok(body) => match extract_content_region(&body) {
            Some(text) => PageContent::Available(text),
            None => PageContent::Unavailable(Unavailable::MissingRegion),
        },
        Err(e) => PageContent::Unavailable(Unavailable::Fetch(e)),
    };

    match &outcome {
        PageContent::Available(text) => debug!(url, chars = text.len(), "page content extracted"),
        PageContent::Unavailable(reason) => {
            warn!(url, %reason, "page content unavailable");
            counter!(PAGES_UNAVAILABLE_TOTAL).increment(1);
        }
    }
    outcome
}

/// Text of the first `div.content-section`, with "more" markers and
/// entity-escaped tags removed and newlines folded into spaces.
pub fn extract_content_region(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let region = doc.select(&CONTENT_SECTION).next()?;
    let text: String = region.text().collect();
    let text = strip_tags(&text).replace("\r\n", "\n").replace(MORE_MARKER, "");
    Some(text.replace(['\n', '\r'], " "))
}
