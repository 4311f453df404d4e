//! Metric names and one-time descriptions.
//!
//! Only the `metrics` facade is used here; installing a recorder/exporter is
//! left to the embedding process.

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

pub const FEEDS_TOTAL: &str = "harvest_feeds_total";
pub const FEED_ERRORS_TOTAL: &str = "harvest_feed_errors_total";
pub const FEED_PARSE_MS: &str = "harvest_feed_parse_ms";
pub const ENTRIES_TOTAL: &str = "harvest_entries_total";
pub const ENTRY_ERRORS_TOTAL: &str = "harvest_entry_errors_total";
pub const PAGES_UNAVAILABLE_TOTAL: &str = "scrape_pages_unavailable_total";
pub const MODEL_CALLS_TOTAL: &str = "scan_model_calls_total";
pub const MODEL_ERRORS_TOTAL: &str = "scan_model_errors_total";
pub const MODEL_CALL_MS: &str = "scan_model_call_ms";
pub const DEALS_SELECTED_TOTAL: &str = "scan_deals_selected_total";
pub const DEALS_UNPRICED_TOTAL: &str = "scan_deals_unpriced_total";

/// One-time metrics registration (so series carry descriptions once a recorder exists).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(FEEDS_TOTAL, "Feeds visited by the harvester.");
        describe_counter!(FEED_ERRORS_TOTAL, "Feed fetch/parse failures.");
        describe_histogram!(FEED_PARSE_MS, "Feed XML parse time in milliseconds.");
        describe_counter!(ENTRIES_TOTAL, "Feed entries consumed by the harvester.");
        describe_counter!(
            ENTRY_ERRORS_TOTAL,
            "Feed entries rejected by the extractor (e.g. no links)."
        );
        describe_counter!(
            PAGES_UNAVAILABLE_TOTAL,
            "Deal pages that failed to load or lacked a content region."
        );
        describe_counter!(MODEL_CALLS_TOTAL, "Structured model calls issued.");
        describe_counter!(MODEL_ERRORS_TOTAL, "Structured model calls that failed.");
        describe_histogram!(MODEL_CALL_MS, "Model call latency in milliseconds.");
        describe_counter!(
            DEALS_SELECTED_TOTAL,
            "Deals kept after the positive-price filter."
        );
        describe_counter!(
            DEALS_UNPRICED_TOTAL,
            "Model-selected deals dropped for a non-positive price."
        );
    });
}
