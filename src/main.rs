//! deal-scanner binary entrypoint.
//!
//! Default: harvest the configured feeds, let the model pick the best deals,
//! print the selection as JSON on stdout.
//! `--harvest-only`: print every harvested deal block instead, with a
//! progress bar over the feeds.

use deal_scanner::config::ScannerConfig;
use deal_scanner::ScannerAgent;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so stdout stays machine-readable.
/// `DEAL_SCANNER_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("deal_scanner=info,warn"));

    let json = std::env::var("DEAL_SCANNER_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let harvest_only = std::env::args().skip(1).any(|a| a == "--harvest-only");

    let cfg = ScannerConfig::load()?;
    let agent = ScannerAgent::from_config(&cfg)?;

    if harvest_only {
        let deals = agent.harvester().fetch(true).await?;
        for deal in &deals {
            println!("{}\n", deal.describe());
        }
        return Ok(());
    }

    let selection = agent.scan().await;
    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(())
}
