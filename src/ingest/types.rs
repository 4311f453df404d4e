// src/ingest/types.rs
use std::time::Duration;

use crate::error::FeedError;

/// One `href`-bearing link of a feed entry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedLink {
    pub href: String,
}

/// A feed entry as the feed parser hands it over, before any scraping.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RawFeedEntry {
    pub title: String,
    pub summary: String, // HTML fragment
    pub links: Vec<FeedLink>,
}

impl RawFeedEntry {
    pub fn new(title: impl Into<String>, summary: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            links: vec![FeedLink { href: href.into() }],
        }
    }
}

/// Fetches and parses one syndication feed.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn entries(&self, feed_url: &str) -> Result<Vec<RawFeedEntry>, FeedError>;
    fn name(&self) -> &'static str;
}

/// Rate limit applied after every consumed feed entry.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Hard sleep of a fixed duration. Not adaptive.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl FixedDelay {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

#[async_trait::async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}
