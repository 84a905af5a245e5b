use anyhow::{Context, Result, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HoldingConfig {
    pub code: String,
    #[serde(default)]
    pub shares: f64,
    pub cost: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MarketIndex {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MarketConfig {
    #[serde(default = "default_indices")]
    pub indices: Vec<MarketIndex>,
    #[serde(default = "default_hot")]
    pub hot: Vec<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            indices: default_indices(),
            hot: default_hot(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FundgzProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FundgzProviderConfig {
    fn default() -> Self {
        FundgzProviderConfig {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

/// Allowed request timeout. Shorter fails every fetch, longer stalls the views.
pub const TIMEOUT_RANGE_MS: RangeInclusive<u64> = 1000..=3000;

impl FundgzProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            TIMEOUT_RANGE_MS.contains(&self.timeout_ms),
            "providers.fundgz.timeout_ms must be between {} and {} ms, got {}",
            TIMEOUT_RANGE_MS.start(),
            TIMEOUT_RANGE_MS.end(),
            self.timeout_ms
        );
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub fundgz: FundgzProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_holdings")]
    pub holdings: Vec<HoldingConfig>,
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_buy_lot")]
    pub buy_lot: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            holdings: default_holdings(),
            watchlist: default_watchlist(),
            market: MarketConfig::default(),
            providers: ProvidersConfig::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            buy_lot: default_buy_lot(),
        }
    }
}

fn default_holdings() -> Vec<HoldingConfig> {
    ["161725", "005827", "000001", "161028", "001156"]
        .into_iter()
        .map(|code| HoldingConfig {
            code: code.to_string(),
            shares: if code == "161725" { 1000.0 } else { 0.0 },
            cost: None,
        })
        .collect()
}

fn default_watchlist() -> Vec<String> {
    vec!["003096".to_string(), "001594".to_string()]
}

fn default_indices() -> Vec<MarketIndex> {
    [
        ("000001", "上证指数(参考华夏)"),
        ("161725", "白酒指数(招商)"),
        ("007460", "半导体(华夏)"),
    ]
    .into_iter()
    .map(|(code, name)| MarketIndex {
        code: code.to_string(),
        name: name.to_string(),
    })
    .collect()
}

fn default_hot() -> Vec<String> {
    ["005918", "005827", "161725", "003096"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_base_url() -> String {
    "http://fundgz.1234567.com.cn".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_buy_lot() -> f64 {
    1000.0
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("cn", "fundwatch", "fundwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .providers
            .fundgz
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
