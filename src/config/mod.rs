//! Runtime configuration: feed list, harvest pacing and the model provider.
//!
//! Every setting has a working default, so an empty environment yields the
//! stock dealnews harvest with the OpenAI key read from `OPENAI_API_KEY`.

pub mod ai;
pub mod feeds;

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::ingest::{FeedFailure, DEFAULT_ENTRIES_PER_FEED, DEFAULT_ENTRY_DELAY_MS};

pub use ai::AiConfig;

pub const ENV_ENTRIES_PER_FEED: &str = "DEAL_ENTRIES_PER_FEED";
pub const ENV_ENTRY_DELAY_MS: &str = "DEAL_ENTRY_DELAY_MS";
pub const ENV_FEED_FAILURE: &str = "DEAL_FEED_FAILURE";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "DEAL_HTTP_TIMEOUT_SECS";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Knobs of the feed harvester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    pub entries_per_feed: usize,
    pub entry_delay_ms: u64,
    pub on_feed_error: FeedFailure,
    /// Request timeout for feed and page fetches.
    pub http_timeout_secs: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            entries_per_feed: DEFAULT_ENTRIES_PER_FEED,
            entry_delay_ms: DEFAULT_ENTRY_DELAY_MS,
            on_feed_error: FeedFailure::default(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl HarvestConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let entries_per_feed =
            env_parse(ENV_ENTRIES_PER_FEED, "entries_per_feed")?.unwrap_or(defaults.entries_per_feed);
        if entries_per_feed == 0 {
            return Err(ConfigError::InvalidValue {
                field: "entries_per_feed",
                reason: "must be at least 1".into(),
            });
        }
        let http_timeout_secs = env_parse(ENV_HTTP_TIMEOUT_SECS, "http_timeout_secs")?
            .unwrap_or(defaults.http_timeout_secs);
        if http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http_timeout_secs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self {
            entries_per_feed,
            entry_delay_ms: env_parse(ENV_ENTRY_DELAY_MS, "entry_delay_ms")?
                .unwrap_or(defaults.entry_delay_ms),
            on_feed_error: env_parse(ENV_FEED_FAILURE, "on_feed_error")?
                .unwrap_or(defaults.on_feed_error),
            http_timeout_secs,
        })
    }
}

fn env_parse<T>(key: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            }),
        _ => Ok(None),
    }
}

/// Everything the scanner binary needs.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub feeds: Vec<String>,
    pub harvest: HarvestConfig,
    pub ai: AiConfig,
}

impl ScannerConfig {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            feeds: feeds::load_feeds_default()?,
            harvest: HarvestConfig::from_env()?,
            ai: AiConfig::load_default()?,
        })
    }
}
