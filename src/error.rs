//! Error kinds for every stage of the harvest-then-select cycle.
//!
//! Page fetch failures are absorbed inside `scrape::fetch_content`, model
//! failures inside `ScannerAgent::scan`. The rest surface to whoever calls the
//! stage directly.

use thiserror::Error;

/// Failure fetching a single deal page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("http error {status}")]
    Http { status: u16 },

    #[error("unreadable body: {0}")]
    Body(String),
}

impl FetchError {
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Http {
                status: status.as_u16(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

/// Failure fetching or parsing a syndication feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("network error: {0}")]
    Network(String),

    #[error("http error {status}")]
    Http { status: u16 },

    #[error("unparseable feed: {0}")]
    Parse(String),
}

/// A feed entry that violates the extractor's preconditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("feed entry '{title}' has no links")]
    MissingLink { title: String },
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("feed {url} failed: {source}")]
    Feed {
        url: String,
        #[source]
        source: FeedError,
    },

    #[error("invalid entry in feed {feed_url}: {source}")]
    Entry {
        feed_url: String,
        #[source]
        source: ExtractError,
    },
}

/// Failure of the schema-constrained model call.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("network error: {0}")]
    Network(String),

    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response envelope: {0}")]
    Envelope(String),

    #[error("model refused: {0}")]
    Refusal(String),

    #[error("model returned no content")]
    Empty,

    #[error("response does not match the DealSelection schema: {0}")]
    Schema(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Harvest(#[from] HarvestError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Invalid environment-provided settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
