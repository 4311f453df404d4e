// src/ingest/providers/rss.rs
use std::time::Duration;

use async_trait::async_trait;
use metrics::histogram;
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::{Captures, Regex};
use serde::Deserialize;

use crate::error::FeedError;
use crate::ingest::types::{FeedLink, FeedSource, RawFeedEntry};
use crate::metrics::FEED_PARSE_MS;

const USER_AGENT: &str = "deal-scanner/0.1";

// RSS 2.0
#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
}

// Atom 1.0
#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}
#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
}
#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}
#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

impl From<Item> for RawFeedEntry {
    fn from(it: Item) -> Self {
        RawFeedEntry {
            title: it.title.unwrap_or_default(),
            summary: it.description.unwrap_or_default(),
            links: it
                .link
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .map(|href| FeedLink { href })
                .into_iter()
                .collect(),
        }
    }
}

impl From<AtomEntry> for RawFeedEntry {
    fn from(e: AtomEntry) -> Self {
        let mut links = e.link;
        // Alternate links first, otherwise document order.
        links.sort_by_key(|l| !matches!(l.rel.as_deref(), None | Some("alternate")));
        RawFeedEntry {
            title: e.title.map(|t| t.value).unwrap_or_default(),
            summary: e
                .summary
                .or(e.content)
                .map(|t| t.value)
                .unwrap_or_default(),
            links: links
                .into_iter()
                .map(|l| FeedLink { href: l.href })
                .collect(),
        }
    }
}

/// Feed source over HTTP; understands RSS 2.0 and Atom.
pub struct RssFeedSource {
    client: reqwest::Client,
}

impl RssFeedSource {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Parse a feed document into entries, in document order.
    pub fn parse_entries(xml: &str) -> Result<Vec<RawFeedEntry>, FeedError> {
        let t0 = std::time::Instant::now();
        let xml_clean = scrub_html_entities_for_xml(xml);

        let entries: Vec<RawFeedEntry> = match from_str::<Rss>(&xml_clean) {
            Ok(rss) => rss.channel.item.into_iter().map(RawFeedEntry::from).collect(),
            Err(rss_err) => match from_str::<AtomFeed>(&xml_clean) {
                Ok(feed) if !feed.entry.is_empty() || xml_clean.contains("<feed") => {
                    feed.entry.into_iter().map(RawFeedEntry::from).collect()
                }
                _ => return Err(FeedError::Parse(rss_err.to_string())),
            },
        };

        histogram!(FEED_PARSE_MS).record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(entries)
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn entries(&self, feed_url: &str) -> Result<Vec<RawFeedEntry>, FeedError> {
        let resp = self
            .client
            .get(feed_url)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Http {
                status: status.as_u16(),
            });
        }
        let body = resp
            .text()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;
        Self::parse_entries(&body)
    }

    fn name(&self) -> &'static str {
        "rss"
    }
}

static RE_NAMED_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").unwrap());

/// XML only knows five named entities; feeds routinely leak HTML ones.
///
/// Common punctuation is folded to ASCII, every other HTML entity becomes a
/// numeric reference. Names HTML does not know either are escaped as text.
fn scrub_html_entities_for_xml(s: &str) -> String {
    let folded = s
        .replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&trade;", "(TM)")
        .replace("&reg;", "(R)")
        .replace("&hellip;", "...");

    RE_NAMED_ENTITY
        .replace_all(&folded, |caps: &Captures| {
            let entity = &caps[0];
            if matches!(&caps[1], "amp" | "lt" | "gt" | "quot" | "apos") {
                return entity.to_string();
            }
            let decoded = html_escape::decode_html_entities(entity);
            if decoded == entity {
                format!("&amp;{}", &entity[1..])
            } else {
                decoded.chars().map(|c| format!("&#{};", c as u32)).collect()
            }
        })
        .into_owned()
}
