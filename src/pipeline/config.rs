use crate::ingest::AuctionFeedConfig;
use crate::logic::path_finder::{ConfigError, PathConfig};
use crate::logic::pools::TokenId;
use crate::logic::strategy::GradientConfig;
use crate::utils::config_loader::{LoadConfigError, load_from_file};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Top-level TOML configuration. Every section is defaulted so a partial
/// file is enough; `${ENV_VAR}` placeholders are expanded before parsing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArbConfig {
    #[serde(default)]
    pub path: PathSection,
    #[serde(default)]
    pub two_pool: TwoPoolSection,
    #[serde(default)]
    pub gradient: GradientSection,
    #[serde(default)]
    pub feed: FeedSection,
    #[serde(default)]
    pub cache: CacheSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathSection {
    pub max_path_length: usize,
    pub min_liquidity: Decimal,
    pub custom_paths: Vec<Vec<String>>,
    pub start_tokens: Option<Vec<String>>,
    pub blacklist_tokens: Vec<String>,
    pub blacklist_dexes: Vec<String>,
    pub prefer_custom_paths_exclusively: bool,
}

impl Default for PathSection {
    fn default() -> Self {
        Self {
            max_path_length: 3,
            min_liquidity: Decimal::ZERO,
            custom_paths: vec![],
            start_tokens: None,
            blacklist_tokens: vec![],
            blacklist_dexes: vec![],
            prefer_custom_paths_exclusively: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TwoPoolSection {
    pub profit_threshold: Decimal,
}

impl Default for TwoPoolSection {
    fn default() -> Self {
        Self { profit_threshold: Decimal::ZERO }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GradientSection {
    pub learning_rate: Decimal,
    pub max_iterations: u32,
    pub profit_threshold: Decimal,
    pub min_gradient: Decimal,
    pub delta: Decimal,
}

impl Default for GradientSection {
    fn default() -> Self {
        let defaults = GradientConfig::default();
        Self {
            learning_rate: defaults.learning_rate,
            max_iterations: defaults.max_iterations,
            profit_threshold: defaults.profit_threshold,
            min_gradient: defaults.min_gradient,
            delta: defaults.delta,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    pub url: String,
    pub connection_timeout_secs: u64,
    pub max_reconnect_attempts: u32,
    pub reconnect_delay_secs: u64,
}

impl Default for FeedSection {
    fn default() -> Self {
        let defaults = AuctionFeedConfig::default();
        Self {
            url: defaults.url,
            connection_timeout_secs: defaults.connection_timeout.as_secs(),
            max_reconnect_attempts: defaults.max_reconnect_attempts,
            reconnect_delay_secs: defaults.reconnect_delay.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub price_ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self { price_ttl_secs: 300 }
    }
}

impl ArbConfig {
    pub async fn load(file_name: String) -> Result<Self, LoadConfigError> {
        load_from_file(file_name).await
    }

    pub fn path_config(&self) -> Result<PathConfig, ConfigError> {
        let mut builder = PathConfig::builder()
            .max_path_length(self.path.max_path_length)
            .min_liquidity(self.path.min_liquidity)
            .prefer_custom_paths_exclusively(self.path.prefer_custom_paths_exclusively);

        for sequence in &self.path.custom_paths {
            builder = builder.custom_path(sequence.iter().map(TokenId::new).collect());
        }
        if let Some(start_tokens) = &self.path.start_tokens {
            builder = builder.start_tokens(start_tokens.iter().map(TokenId::new));
        }
        for token in &self.path.blacklist_tokens {
            builder = builder.blacklist_token(TokenId::new(token));
        }
        for dex in &self.path.blacklist_dexes {
            builder = builder.blacklist_dex(dex.clone());
        }
        builder.build()
    }

    pub fn gradient_config(&self) -> GradientConfig {
        GradientConfig {
            learning_rate: self.gradient.learning_rate,
            max_iterations: self.gradient.max_iterations,
            profit_threshold: self.gradient.profit_threshold,
            min_gradient: self.gradient.min_gradient,
            delta: self.gradient.delta,
            ..Default::default()
        }
    }

    pub fn feed_config(&self) -> AuctionFeedConfig {
        AuctionFeedConfig {
            url: self.feed.url.clone(),
            connection_timeout: Duration::from_secs(self.feed.connection_timeout_secs),
            max_reconnect_attempts: self.feed.max_reconnect_attempts,
            reconnect_delay: Duration::from_secs(self.feed.reconnect_delay_secs),
        }
    }

    pub fn price_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.price_ttl_secs)
    }
}
