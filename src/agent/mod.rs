//! Selection agent: harvested deals in, the model's five best-priced picks out.

pub mod openai;
pub mod prompts;
pub mod schema;
pub mod selection;

pub use openai::OpenAiModel;
pub use prompts::build_user_prompt;
pub use selection::{CandidateDeal, DealSelection};

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ScannerConfig;
use crate::error::{ModelError, ScanError};
use crate::ingest::providers::RssFeedSource;
use crate::ingest::types::FixedDelay;
use crate::ingest::DealHarvester;
use crate::metrics::{
    ensure_described, DEALS_SELECTED_TOTAL, DEALS_UNPRICED_TOTAL, MODEL_CALLS_TOTAL, MODEL_CALL_MS,
    MODEL_ERRORS_TOTAL,
};
use crate::scrape::HttpPageFetcher;

/// Schema-constrained generation: `(instructions, prompt, schema) -> DealSelection`.
///
/// Implementations must reject output that does not match `schema`.
#[async_trait]
pub trait DealModel: Send + Sync {
    async fn select(
        &self,
        instructions: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<DealSelection, ModelError>;
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub struct ScannerAgent {
    harvester: DealHarvester,
    model: Arc<dyn DealModel>,
    schema: Value,
}

impl ScannerAgent {
    pub fn new(harvester: DealHarvester, model: Arc<dyn DealModel>) -> Self {
        Self {
            harvester,
            model,
            schema: schema::strict_schema::<DealSelection>(),
        }
    }

    /// Wire the HTTP feed source, page fetcher and OpenAI model from config.
    pub fn from_config(cfg: &ScannerConfig) -> anyhow::Result<Self> {
        let timeout = std::time::Duration::from_secs(cfg.harvest.http_timeout_secs);
        let harvester = DealHarvester::new(
            cfg.feeds.clone(),
            Arc::new(RssFeedSource::new(timeout)?),
            Arc::new(HttpPageFetcher::new(timeout)?),
        )
        .with_pacer(Arc::new(FixedDelay::from_millis(cfg.harvest.entry_delay_ms)))
        .with_entries_per_feed(cfg.harvest.entries_per_feed)
        .with_feed_failure(cfg.harvest.on_feed_error);

        info!(
            provider = %cfg.ai.provider,
            model = %cfg.ai.model,
            key_len = cfg.ai.api_key.len(),
            feeds = cfg.feeds.len(),
            "scanner configured"
        );
        Ok(Self::new(harvester, Arc::new(OpenAiModel::new(&cfg.ai)?)))
    }

    pub fn harvester(&self) -> &DealHarvester {
        &self.harvester
    }

    /// Harvest, select and price-filter. Any failure is logged and yields an
    /// empty selection.
    pub async fn scan(&self) -> DealSelection {
        match self.try_scan().await {
            Ok(selection) => selection,
            Err(e) => {
                warn!(error = %e, "failed to scan for deals");
                DealSelection::default()
            }
        }
    }

    /// Same pipeline as `scan`, with the failure reason kept.
    pub async fn try_scan(&self) -> Result<DealSelection, ScanError> {
        ensure_described();

        let deals = self.harvester.fetch(false).await?;
        if deals.is_empty() {
            info!("no deals harvested; model not called");
            return Ok(DealSelection::default());
        }

        let prompt = build_user_prompt(&deals);
        counter!(MODEL_CALLS_TOTAL).increment(1);
        let t0 = Instant::now();
        let result = self
            .model
            .select(prompts::SYSTEM_INSTRUCTIONS, &prompt, &self.schema)
            .await;
        histogram!(MODEL_CALL_MS).record(t0.elapsed().as_secs_f64() * 1_000.0);
        let selection = result.inspect_err(|_| counter!(MODEL_ERRORS_TOTAL).increment(1))?;

        let returned = selection.len();
        let selection = selection.retain_priced();
        let dropped = returned - selection.len();
        counter!(DEALS_SELECTED_TOTAL).increment(selection.len() as u64);
        counter!(DEALS_UNPRICED_TOTAL).increment(dropped as u64);

        info!(
            provider = self.model.name(),
            harvested = deals.len(),
            selected = selection.len(),
            dropped,
            "scan finished"
        );
        Ok(selection)
    }
}
