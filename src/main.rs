use anyhow::Context;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use vigil::assets::AssetRegistry;
use vigil::classify::ThresholdConfig;
use vigil::config::Config;
use vigil::etherscan::EtherscanClient;
use vigil::notify::LogNotifier;
use vigil::scheduler::{PollTiming, VigilScheduler};
use vigil::watchlist;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config
    let config = if Path::new("vigil.toml").exists() {
        Config::load(Path::new("vigil.toml"))?
    } else {
        Config::from_env()
    };

    // Initialize logging
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    }

    info!("vigil v{} starting", env!("CARGO_PKG_VERSION"));

    // Both of these are fatal before any polling begins.
    if !config.has_credentials() {
        error!("no Etherscan credential configured");
        anyhow::bail!("ETHERSCAN_API_KEY is not set");
    }
    let watchlist = watchlist::load(Path::new(&config.watchlist.path))
        .context("failed to load watchlist")?;

    let thresholds = ThresholdConfig::from_settings(&config.thresholds)
        .context("invalid threshold configuration")?;

    info!(
        entities = watchlist.len(),
        eth_omen = %thresholds.eth_omen,
        stable_omen = %thresholds.stable_omen,
        "watchlist loaded"
    );

    let scheduler = VigilScheduler::new(
        EtherscanClient::new(&config.etherscan),
        LogNotifier,
        watchlist,
        AssetRegistry::mainnet(),
        thresholds,
        PollTiming::from_config(&config.poll),
        config.etherscan.tx_url.clone(),
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down...");
            signal_cancel.cancel();
        }
    });

    scheduler.run(cancel).await;

    Ok(())
}
