use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bounty_trends::config::Config;
use bounty_trends::tracker::TrendTracker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bounty_trends=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path =
        std::env::var("TRENDS_CONFIG").unwrap_or_else(|_| "trends.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    info!("Tracking {} feeds", config.feeds.len());

    let tracker = TrendTracker::new(config)?;

    info!("Fetching and analyzing bug bounty trends");
    match tracker.run().await {
        Ok(summary) => info!(
            "Trends saved to {} ({} entries)",
            summary.report_path.display(),
            summary.entries.len()
        ),
        // Report failures end the run without output but are not a process error
        Err(e) => error!("{}", e),
    }

    Ok(())
}
