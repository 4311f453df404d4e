// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod agent;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod scrape;

// ---- Re-exports for stable public API ----
pub use crate::agent::{CandidateDeal, DealModel, DealSelection, ScannerAgent};
pub use crate::ingest::types::{FeedLink, FeedSource, Pacer, RawFeedEntry};
pub use crate::ingest::{normalize, DealHarvester, FeedFailure};
pub use crate::scrape::{fetch_content, PageContent, PageFetcher, ScrapedDeal};
