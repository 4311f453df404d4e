// src/scrape/deal.rs
use std::fmt;

use serde::Serialize;

use crate::error::ExtractError;
use crate::ingest::normalize;
use crate::ingest::types::RawFeedEntry;
use crate::scrape::{fetch_content, PageFetcher};

/// Boundary between the details and features sections of a deal page.
pub const FEATURES_MARKER: &str = "Features";

/// A feed entry enriched with its scraped page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapedDeal {
    title: String,
    summary: String,
    url: String,
    details: String,
    features: String,
}

impl ScrapedDeal {
    /// Build a deal from one feed entry, fetching its first link.
    ///
    /// The entry must carry at least one link; otherwise
    /// `ExtractError::MissingLink` is returned and nothing is fetched.
    pub async fn from_entry(
        entry: RawFeedEntry,
        pages: &dyn PageFetcher,
    ) -> Result<Self, ExtractError> {
        let title = entry.title.trim().to_string();
        let Some(first) = entry.links.into_iter().next() else {
            return Err(ExtractError::MissingLink { title });
        };
        let summary = normalize(&entry.summary);
        let content = fetch_content(pages, &first.href).await.into_text();
        Ok(Self::from_parts(title, summary, first.href, &content))
    }

    /// Assemble a deal from flattened content-region text, as produced by
    /// `fetch_content`. Markup in `content` is not stripped here.
    pub(crate) fn from_parts(
        title: impl Into<String>,
        summary: impl Into<String>,
        url: impl Into<String>,
        content: &str,
    ) -> Self {
        let (details, features) = split_features(&content.replace(['\r', '\n'], " "));
        Self {
            title: title.into().trim().to_string(),
            summary: summary.into(),
            url: url.into(),
            details,
            features,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn features(&self) -> &str {
        &self.features
    }

    /// Four-line rendering used as one block of the selection prompt.
    pub fn describe(&self) -> String {
        format!(
            "Title: {}\nDetails: {}\nFeatures: {}\nURL: {}",
            self.title, self.details, self.features, self.url
        )
    }
}

impl fmt::Display for ScrapedDeal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.title)
    }
}

/// Split page text at the first case-sensitive "Features"; both halves trimmed.
///
/// Plain substring match: prose that mentions "Features" mid-sentence is cut there.
pub fn split_features(content: &str) -> (String, String) {
    match content.split_once(FEATURES_MARKER) {
        Some((details, features)) => (details.trim().to_string(), features.trim().to_string()),
        None => (content.trim().to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_marker_only() {
        let (d, f) = split_features("A B Features C D Features E");
        assert_eq!(d, "A B");
        assert_eq!(f, "C D Features E");
    }

    #[test]
    fn no_marker_means_no_features() {
        let (d, f) = split_features("  Just details content  ");
        assert_eq!(d, "Just details content");
        assert_eq!(f, "");
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        let (d, f) = split_features("key features listed");
        assert_eq!(d, "key features listed");
        assert!(f.is_empty());
    }

    #[test]
    fn describe_has_four_lines() {
        let deal = ScrapedDeal::from_parts(
            "Deal A",
            "Save big",
            "https://x/1",
            "Great gadget Features Works great",
        );
        assert_eq!(
            deal.describe(),
            "Title: Deal A\nDetails: Great gadget\nFeatures: Works great\nURL: https://x/1"
        );
        assert_eq!(deal.to_string(), "<Deal A>");
    }
}
