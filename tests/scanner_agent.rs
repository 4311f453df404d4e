// tests/scanner_agent.rs
use async_trait::async_trait;
use deal_scanner::agent::prompts::{SYSTEM_INSTRUCTIONS, USER_PROMPT_PREFIX, USER_PROMPT_SUFFIX};
use deal_scanner::error::{FeedError, FetchError, HarvestError, ModelError, ScanError};
use deal_scanner::{
    DealHarvester, DealModel, DealSelection, FeedFailure, FeedSource, Pacer, PageFetcher, RawFeedEntry,
    ScannerAgent,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct OneFeed(Result<Vec<RawFeedEntry>, ()>);

#[async_trait]
impl FeedSource for OneFeed {
    async fn entries(&self, _feed_url: &str) -> Result<Vec<RawFeedEntry>, FeedError> {
        self.0
            .clone()
            .map_err(|_| FeedError::Parse("not a feed".into()))
    }

    fn name(&self) -> &'static str {
        "one"
    }
}

struct Pages;

#[async_trait]
impl PageFetcher for Pages {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        Ok(format!(
            "<div class=\"content-section\">Details for {url}\nFeatures\nFast</div>"
        ))
    }
}

struct NoWait;

#[async_trait]
impl Pacer for NoWait {
    async fn pause(&self) {}
}

/// What the model was asked, plus a canned answer.
struct Recorded {
    instructions: String,
    prompt: String,
    schema: Value,
}

struct ScriptedModel {
    answer: Mutex<Option<Result<DealSelection, ModelError>>>,
    calls: AtomicUsize,
    seen: Mutex<Option<Recorded>>,
}

impl ScriptedModel {
    fn answering(answer: Result<DealSelection, ModelError>) -> Arc<Self> {
        Arc::new(Self {
            answer: Mutex::new(Some(answer)),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(None),
        })
    }
}

#[async_trait]
impl DealModel for ScriptedModel {
    async fn select(
        &self,
        instructions: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<DealSelection, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen.lock().unwrap() = Some(Recorded {
            instructions: instructions.to_string(),
            prompt: prompt.to_string(),
            schema: schema.clone(),
        });
        self.answer
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(ModelError::Empty))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

fn selection(prices: &[f64]) -> DealSelection {
    let deals: Vec<Value> = prices
        .iter()
        .enumerate()
        .map(|(i, p)| {
            json!({
                "product_description": format!("Product {i} described at length."),
                "price": p,
                "url": format!("https://x/{i}")
            })
        })
        .collect();
    serde_json::from_value(json!({ "deals": deals })).unwrap()
}

fn harvester(feed: Result<Vec<RawFeedEntry>, ()>) -> DealHarvester {
    DealHarvester::new(vec!["https://f/deals".into()], Arc::new(OneFeed(feed)), Arc::new(Pages))
        .with_pacer(Arc::new(NoWait))
}

fn two_entries() -> Vec<RawFeedEntry> {
    vec![
        RawFeedEntry::new("  Deal A  ", r#"<div class="snippet summary">Save big</div>"#, "https://x/1"),
        RawFeedEntry::new("Deal B", "plain", "https://x/2"),
    ]
}

#[tokio::test]
async fn empty_harvest_skips_the_model() {
    let model = ScriptedModel::answering(Ok(selection(&[10.0])));
    let agent = ScannerAgent::new(harvester(Ok(vec![])), model.clone());

    let result = agent.scan().await;

    assert!(result.is_empty());
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unpriced_deals_are_filtered_in_order() {
    let model = ScriptedModel::answering(Ok(selection(&[50.0, 0.0, -5.0, 12.5])));
    let agent = ScannerAgent::new(harvester(Ok(two_entries())), model.clone());

    let result = agent.scan().await;

    let prices: Vec<f64> = result.deals.iter().map(|d| d.price()).collect();
    assert_eq!(prices, vec![50.0, 12.5]);
    assert_eq!(result.deals[1].url(), "https://x/3");
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn five_priced_deals_pass_through() {
    let model = ScriptedModel::answering(Ok(selection(&[1.0, 2.0, 3.0, 4.0, 5.0])));
    let agent = ScannerAgent::new(harvester(Ok(two_entries())), model);

    let result = agent.try_scan().await.unwrap();
    assert_eq!(result.len(), 5);
}

#[tokio::test]
async fn prompt_carries_every_deal_block() {
    let model = ScriptedModel::answering(Ok(selection(&[5.0])));
    let agent = ScannerAgent::new(harvester(Ok(two_entries())), model.clone());

    agent.scan().await;

    let seen = model.seen.lock().unwrap().take().expect("model called");
    assert_eq!(seen.instructions, SYSTEM_INSTRUCTIONS);
    assert!(seen.prompt.starts_with(USER_PROMPT_PREFIX));
    assert!(seen.prompt.ends_with(USER_PROMPT_SUFFIX));
    assert!(seen.prompt.contains(
        "Title: Deal A\nDetails: Details for https://x/1\nFeatures: Fast\nURL: https://x/1\n\nTitle: Deal B\n"
    ));
}

#[tokio::test]
async fn schema_handed_to_model_is_strict() {
    let model = ScriptedModel::answering(Ok(selection(&[5.0])));
    let agent = ScannerAgent::new(harvester(Ok(two_entries())), model.clone());

    agent.scan().await;

    let seen = model.seen.lock().unwrap().take().expect("model called");
    assert_eq!(seen.schema["type"], "object");
    assert_eq!(seen.schema["additionalProperties"], false);
    assert_eq!(seen.schema["required"], json!(["deals"]));
    assert!(seen.schema.get("definitions").is_none());
}

#[tokio::test]
async fn model_failure_yields_empty_selection() {
    let model = ScriptedModel::answering(Err(ModelError::Api {
        status: 429,
        body: "rate limited".into(),
    }));
    let agent = ScannerAgent::new(harvester(Ok(two_entries())), model.clone());

    assert!(agent.scan().await.is_empty());
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn try_scan_keeps_model_error() {
    let model = ScriptedModel::answering(Err(ModelError::Refusal("no".into())));
    let agent = ScannerAgent::new(harvester(Ok(two_entries())), model);

    let err = agent.try_scan().await.unwrap_err();
    assert!(matches!(err, ScanError::Model(ModelError::Refusal(_))));
}

#[tokio::test]
async fn aborted_harvest_surfaces_from_try_scan_only() {
    let model = ScriptedModel::answering(Ok(selection(&[5.0])));
    let agent = ScannerAgent::new(
        harvester(Err(())).with_feed_failure(FeedFailure::Abort),
        model.clone(),
    );

    let err = agent.try_scan().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Harvest(HarvestError::Feed {
            source: FeedError::Parse(_),
            ..
        })
    ));
    assert!(agent.scan().await.is_empty());
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn skipped_feed_means_no_deals_and_no_call() {
    let model = ScriptedModel::answering(Ok(selection(&[5.0])));
    let agent = ScannerAgent::new(harvester(Err(())), model.clone());

    assert!(agent.try_scan().await.unwrap().is_empty());
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}
