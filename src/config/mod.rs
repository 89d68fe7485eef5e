use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required env var: {0}")]
    MissingEnv(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub etherscan: EtherscanConfig,
    #[serde(default)]
    pub thresholds: ThresholdSettings,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EtherscanConfig {
    /// Etherscan REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Base URL for human-readable transaction links
    #[serde(default = "default_tx_url")]
    pub tx_url: String,
    /// API key - loaded from env ETHERSCAN_API_KEY, never from the file
    #[serde(default)]
    pub api_key: String,
    /// Records fetched per query kind (token + native), most recent first
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdSettings {
    /// Minimum inbound ETH / WETH amount that raises an alert.
    #[serde(default = "default_eth_omen")]
    pub eth_omen: f64,
    /// Minimum inbound stablecoin amount that raises an alert.
    #[serde(default = "default_stable_omen")]
    pub stable_omen: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistConfig {
    /// Path to the line-oriented watchlist file.
    #[serde(default = "default_watchlist_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Pause between watched addresses within one cycle, in seconds.
    #[serde(default = "default_entity_delay")]
    pub entity_delay_secs: u64,
    /// Pause between full cycles over the watchlist, in seconds.
    #[serde(default = "default_cycle_delay")]
    pub cycle_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_api_url() -> String {
    "https://api.etherscan.io/api".to_string()
}
fn default_tx_url() -> String {
    "https://etherscan.io/tx".to_string()
}
fn default_page_size() -> u32 {
    25
}
fn default_eth_omen() -> f64 {
    10.0
}
fn default_stable_omen() -> f64 {
    20_000.0
}
fn default_watchlist_path() -> String {
    "watch_list.txt".to_string()
}
fn default_entity_delay() -> u64 {
    3
}
fn default_cycle_delay() -> u64 {
    45
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EtherscanConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            tx_url: default_tx_url(),
            api_key: String::new(),
            page_size: default_page_size(),
        }
    }
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            eth_omen: default_eth_omen(),
            stable_omen: default_stable_omen(),
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            path: default_watchlist_path(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            entity_delay_secs: default_entity_delay(),
            cycle_delay_secs: default_cycle_delay(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load config from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.overlay_env();
        Ok(config)
    }

    /// Load a default config with env-only overrides (no file needed).
    pub fn from_env() -> Self {
        let mut config = Config {
            etherscan: EtherscanConfig::default(),
            thresholds: ThresholdSettings::default(),
            watchlist: WatchlistConfig::default(),
            poll: PollConfig::default(),
            logging: LoggingConfig::default(),
        };
        config.overlay_env();
        config
    }

    /// Secrets and operator overrides come from the environment, never
    /// from the config file.
    fn overlay_env(&mut self) {
        if let Ok(key) = std::env::var("ETHERSCAN_API_KEY") {
            self.etherscan.api_key = key;
        }
        if let Some(omen) = env_f64("VIGIL_ETH_OMEN") {
            self.thresholds.eth_omen = omen;
        }
        if let Some(omen) = env_f64("VIGIL_STABLE_OMEN") {
            self.thresholds.stable_omen = omen;
        }
        if let Ok(path) = std::env::var("VIGIL_WATCHLIST") {
            self.watchlist.path = path;
        }
    }

    pub fn has_credentials(&self) -> bool {
        !self.etherscan.api_key.is_empty()
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
