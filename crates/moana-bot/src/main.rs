//! Main entry point for Moana Bot.

use anyhow::Context;
use moana_bot::MoanaBot;
use moana_common::init_logging;
use moana_config::{ConfigLoader, ConfigValidator};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loader = ConfigLoader::from_env();
    let config = loader
        .load()
        .await
        .with_context(|| format!("failed to load {}", loader.path().display()))?;

    // Held for the whole run so buffered file logs are flushed on exit.
    let _log_guard = init_logging(&config.logging.to_options()).context("failed to initialise logging")?;

    ConfigValidator::validate(&config).context("invalid configuration")?;
    for warning in ConfigValidator::warnings(&config) {
        warn!("{}", warning);
    }

    info!("Starting Moana Bot");
    let bot = MoanaBot::new(config);
    if let Err(e) = bot.start().await {
        error!("Bot failed to start: {}", e);
        return Err(e.into());
    }

    Ok(())
}
