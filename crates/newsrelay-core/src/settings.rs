//! Bot behaviour loaded from the YAML config file.
//!
//! Every section is optional; omitted sections fall back to the defaults in
//! [`BotConfig::default`]. [`load_bot_config`] validates the result so that a
//! misconfigured bot stops at startup instead of failing every cycle.

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One feed source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl SourceConfig {
    #[must_use]
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    pub sources: Vec<SourceConfig>,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
    pub image_keywords: Vec<String>,
    pub schedule: ScheduleConfig,
    pub content: ContentConfig,
    pub errors: ErrorConfig,
    pub history: HistoryConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Daily UTC trigger times, `HH:MM`. Ignored when `interval_minutes` is set.
    pub post_times: Vec<String>,
    /// Used only when both `post_times` and `interval_minutes` are empty.
    pub posts_per_day: u32,
    pub interval_minutes: Option<u64>,
    pub min_minutes_between_posts: u64,
    pub initial_lookback_hours: u64,
    pub extended_lookback_hours: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    pub max_post_length: usize,
    pub max_words: usize,
    /// Characters kept free in the rewritten body for mention and hashtags.
    pub reserved_chars: usize,
    pub hashtags_per_post: usize,
    pub include_mentions: bool,
    pub attach_images: bool,
    pub prefix_probability: f64,
    pub suffix_probability: f64,
    /// Length of the cleaned-title fallback used when rewriting fails.
    pub fallback_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    Fixed,
    Exponential,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorConfig {
    pub continue_on_source_error: bool,
    pub post_without_image_on_error: bool,
    /// Total attempts per source fetch, including the first.
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    pub backoff: Backoff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    /// Trim is triggered once the history grows past this many URLs.
    pub cap: usize,
    /// Number of most recent URLs kept by a trim.
    pub retain: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub max_entries_per_source: usize,
    pub concurrency: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::new("cointelegraph", "https://cointelegraph.com/rss"),
                SourceConfig::new(
                    "coindesk",
                    "https://www.coindesk.com/arc/outboundfeeds/rss/",
                ),
                SourceConfig::new("decrypt", "https://decrypt.co/feed"),
                SourceConfig::new("bitcoin_magazine", "https://bitcoinmagazine.com/.rss/full/"),
                SourceConfig::new("cryptonews", "https://cryptonews.com/news/feed/"),
            ],
            hashtags: to_strings(&[
                "#Bitcoin",
                "#BTC",
                "#Ethereum",
                "#ETH",
                "#Crypto",
                "#Cryptocurrency",
                "#Blockchain",
                "#DeFi",
                "#Web3",
                "#Altcoin",
                "#Trading",
                "#Investing",
                "#HODL",
                "#Binance",
                "#Coinbase",
                "#NFT",
                "#Solana",
                "#Cardano",
                "#Polkadot",
                "#Chainlink",
                "#CryptoNews",
                "#DigitalAssets",
                "#Fintech",
                "#Metaverse",
                "#GameFi",
                "#Yield",
                "#Staking",
                "#Layer2",
                "#Lightning",
            ]),
            mentions: to_strings(&[
                "@CoinTelegraph",
                "@CoinDesk",
                "@cz_binance",
                "@VitalikButerin",
                "@aantonop",
                "@APompliano",
                "@naval",
                "@balajis",
                "@DocumentingBTC",
                "@Bitcoin",
                "@ethereum",
                "@solana",
                "@cardano",
                "@Polkadot",
                "@chainlink",
                "@MessariCrypto",
                "@glassnode",
                "@CoinGecko",
                "@CoinMarketCap",
            ]),
            image_keywords: to_strings(&[
                "cryptocurrency",
                "bitcoin",
                "blockchain",
                "finance",
                "technology",
                "digital currency",
                "trading",
                "investment",
                "fintech",
                "money",
                "ethereum",
                "crypto trading",
                "financial technology",
                "digital finance",
                "market analysis",
                "crypto coins",
                "digital assets",
                "defi",
            ]),
            schedule: ScheduleConfig::default(),
            content: ContentConfig::default(),
            errors: ErrorConfig::default(),
            history: HistoryConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            post_times: (0..12).map(|i| format!("{:02}:00", i * 2)).collect(),
            posts_per_day: 12,
            interval_minutes: None,
            min_minutes_between_posts: 60,
            initial_lookback_hours: 12,
            extended_lookback_hours: 48,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_post_length: 250,
            max_words: 60,
            reserved_chars: 50,
            hashtags_per_post: 2,
            include_mentions: true,
            attach_images: true,
            prefix_probability: 0.3,
            suffix_probability: 0.4,
            fallback_chars: 200,
        }
    }
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            continue_on_source_error: true,
            post_without_image_on_error: true,
            max_attempts: 3,
            retry_delay_secs: 5,
            backoff: Backoff::Fixed,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            cap: 2000,
            retain: 1000,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_entries_per_source: 15,
            concurrency: 4,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl BotConfig {
    /// Sources with `enabled: true`, in configuration order.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }
}

/// Load and validate the bot configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_bot_config(path: &Path) -> Result<BotConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_bot_config(&content)
}

/// Parse and validate a bot configuration from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_bot_config(yaml: &str) -> Result<BotConfig, ConfigError> {
    let mut config: BotConfig = serde_yaml::from_str(yaml)?;
    config.hashtags.retain(|t| !t.trim().is_empty());
    config.mentions.retain(|m| !m.trim().is_empty());
    config.image_keywords.retain(|k| !k.trim().is_empty());
    validate_bot_config(&config)?;
    Ok(config)
}

/// Check cross-field constraints that serde cannot express.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] describing the first violated rule.
pub fn validate_bot_config(config: &BotConfig) -> Result<(), ConfigError> {
    validate_sources(&config.sources)?;

    if config.hashtags.is_empty() {
        return Err(ConfigError::Validation(
            "no hashtags configured".to_string(),
        ));
    }

    let content = &config.content;
    if content.max_post_length == 0 {
        return Err(ConfigError::Validation(
            "content.max_post_length must be positive".to_string(),
        ));
    }
    if content.reserved_chars >= content.max_post_length {
        return Err(ConfigError::Validation(format!(
            "content.reserved_chars ({}) must be smaller than content.max_post_length ({})",
            content.reserved_chars, content.max_post_length
        )));
    }
    if content.max_words == 0 {
        return Err(ConfigError::Validation(
            "content.max_words must be positive".to_string(),
        ));
    }
    if content.fallback_chars == 0 {
        return Err(ConfigError::Validation(
            "content.fallback_chars must be positive".to_string(),
        ));
    }
    for (name, p) in [
        ("prefix_probability", content.prefix_probability),
        ("suffix_probability", content.suffix_probability),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::Validation(format!(
                "content.{name} must be within [0, 1], got {p}"
            )));
        }
    }

    config.schedule.trigger()?;
    if config.schedule.extended_lookback_hours < config.schedule.initial_lookback_hours {
        return Err(ConfigError::Validation(
            "schedule.extended_lookback_hours must not be shorter than initial_lookback_hours"
                .to_string(),
        ));
    }

    if config.errors.max_attempts == 0 {
        return Err(ConfigError::Validation(
            "errors.max_attempts must be at least 1".to_string(),
        ));
    }

    if config.history.cap == 0 || config.history.retain > config.history.cap {
        return Err(ConfigError::Validation(format!(
            "history.retain ({}) must not exceed a positive history.cap ({})",
            config.history.retain, config.history.cap
        )));
    }

    if config.fetch.concurrency == 0 || config.fetch.max_entries_per_source == 0 {
        return Err(ConfigError::Validation(
            "fetch.concurrency and fetch.max_entries_per_source must be positive".to_string(),
        ));
    }

    Ok(())
}

fn validate_sources(sources: &[SourceConfig]) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for source in sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }
        if !seen_names.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }
        if !(source.url.starts_with("http://") || source.url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "source '{}' has non-HTTP url '{}'",
                source.name, source.url
            )));
        }
    }

    if !sources.iter().any(|s| s.enabled) {
        return Err(ConfigError::Validation(
            "no enabled news sources configured".to_string(),
        ));
    }

    Ok(())
}

pub(crate) fn parse_post_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| {
        ConfigError::Validation(format!("invalid post time '{raw}' (expected HH:MM): {e}"))
    })
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
