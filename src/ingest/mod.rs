// src/ingest/mod.rs
pub mod normalize;
pub mod providers;
pub mod types;

pub use normalize::normalize;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::ingest::types::{FeedSource, FixedDelay, Pacer};
use crate::metrics::{ensure_described, ENTRIES_TOTAL, ENTRY_ERRORS_TOTAL, FEEDS_TOTAL, FEED_ERRORS_TOTAL};
use crate::scrape::{PageFetcher, ScrapedDeal};

pub const DEFAULT_ENTRIES_PER_FEED: usize = 10;
pub const DEFAULT_ENTRY_DELAY_MS: u64 = 500;

/// What the harvester does when a feed (or one of its entries) is unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedFailure {
    /// Log, count and move on.
    #[default]
    Skip,
    /// Stop the harvest and return the error.
    Abort,
}

impl FromStr for FeedFailure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("expected 'skip' or 'abort', got '{other}'")),
        }
    }
}

impl fmt::Display for FeedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::Abort => "abort",
        })
    }
}

/// Walks the feed list in order and turns entries into `ScrapedDeal`s.
pub struct DealHarvester {
    feeds: Vec<String>,
    source: Arc<dyn FeedSource>,
    pages: Arc<dyn PageFetcher>,
    pacer: Arc<dyn Pacer>,
    entries_per_feed: usize,
    on_feed_error: FeedFailure,
}

impl DealHarvester {
    pub fn new(feeds: Vec<String>, source: Arc<dyn FeedSource>, pages: Arc<dyn PageFetcher>) -> Self {
        Self {
            feeds,
            source,
            pages,
            pacer: Arc::new(FixedDelay(Duration::from_millis(DEFAULT_ENTRY_DELAY_MS))),
            entries_per_feed: DEFAULT_ENTRIES_PER_FEED,
            on_feed_error: FeedFailure::default(),
        }
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_entries_per_feed(mut self, n: usize) -> Self {
        self.entries_per_feed = n;
        self
    }

    pub fn with_feed_failure(mut self, policy: FeedFailure) -> Self {
        self.on_feed_error = policy;
        self
    }

    /// Harvest every feed in order, at most `entries_per_feed` entries each.
    ///
    /// The pacer runs once after every consumed entry, whether or not its page
    /// could be fetched. With `show_progress` a progress bar advances per feed.
    pub async fn fetch(&self, show_progress: bool) -> Result<Vec<ScrapedDeal>, HarvestError> {
        ensure_described();

        let progress = if show_progress {
            progress_bar(self.feeds.len() as u64)
        } else {
            ProgressBar::hidden()
        };

        let mut deals = Vec::new();
        for feed_url in &self.feeds {
            progress.set_message(feed_url.clone());
            counter!(FEEDS_TOTAL).increment(1);

            if let Err(e) = self.harvest_feed(feed_url, &mut deals).await {
                counter!(FEED_ERRORS_TOTAL).increment(1);
                match self.on_feed_error {
                    FeedFailure::Skip => {
                        tracing::warn!(
                            error = %e,
                            source = self.source.name(),
                            feed = %feed_url,
                            "feed skipped"
                        );
                    }
                    FeedFailure::Abort => {
                        progress.abandon();
                        return Err(e);
                    }
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        tracing::info!(
            target: "harvest",
            feeds = self.feeds.len(),
            deals = deals.len(),
            "harvest finished"
        );
        Ok(deals)
    }

    async fn harvest_feed(&self, feed_url: &str, out: &mut Vec<ScrapedDeal>) -> Result<(), HarvestError> {
        let entries = self
            .source
            .entries(feed_url)
            .await
            .map_err(|source| HarvestError::Feed {
                url: feed_url.to_string(),
                source,
            })?;
        tracing::debug!(
            source = self.source.name(),
            feed = %feed_url,
            entries = entries.len(),
            "feed fetched"
        );

        for entry in entries.into_iter().take(self.entries_per_feed) {
            counter!(ENTRIES_TOTAL).increment(1);
            let result = ScrapedDeal::from_entry(entry, self.pages.as_ref()).await;
            self.pacer.pause().await;

            match result {
                Ok(deal) => {
                    tracing::debug!(deal = %deal, "deal scraped");
                    out.push(deal);
                }
                Err(source) => {
                    counter!(ENTRY_ERRORS_TOTAL).increment(1);
                    if self.on_feed_error == FeedFailure::Abort {
                        return Err(HarvestError::Entry {
                            feed_url: feed_url.to_string(),
                            source,
                        });
                    }
                    tracing::warn!(error = %source, feed = %feed_url, "entry skipped");
                }
            }
        }
        Ok(())
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.green/dim}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}
