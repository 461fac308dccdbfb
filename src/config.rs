use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use crate::core::distressed::{DistressedAnalyzer, MarketRate, MarketRateTable};
use crate::core::location::SubstringLocationMatcher;
use crate::core::matcher::MatchingThresholds;
use crate::core::scoring::MatchScorer;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub valuation: ValuationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Which store backs the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Percent above budget still scored as negotiable
    #[serde(default = "default_negotiation_tolerance_pct")]
    pub negotiation_tolerance_pct: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            negotiation_tolerance_pct: default_negotiation_tolerance_pct(),
        }
    }
}

fn default_negotiation_tolerance_pct() -> u32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_location_weight")]
    pub location: u8,
    #[serde(default = "default_open_location_weight")]
    pub open_location: u8,
    #[serde(default = "default_price_weight")]
    pub price: u8,
    #[serde(default = "default_negotiable_price_weight")]
    pub negotiable_price: u8,
    #[serde(default = "default_bedrooms_weight")]
    pub bedrooms: u8,
    #[serde(default = "default_bathrooms_weight")]
    pub bathrooms: u8,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            location: default_location_weight(),
            open_location: default_open_location_weight(),
            price: default_price_weight(),
            negotiable_price: default_negotiable_price_weight(),
            bedrooms: default_bedrooms_weight(),
            bathrooms: default_bathrooms_weight(),
        }
    }
}

fn default_location_weight() -> u8 { 40 }
fn default_open_location_weight() -> u8 { 10 }
fn default_price_weight() -> u8 { 30 }
fn default_negotiable_price_weight() -> u8 { 15 }
fn default_bedrooms_weight() -> u8 { 10 }
fn default_bathrooms_weight() -> u8 { 10 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(value: &WeightsConfig) -> Self {
        Self {
            location: value.location,
            open_location: value.open_location,
            price: value.price,
            negotiable_price: value.negotiable_price,
            bedrooms: value.bedrooms,
            bathrooms: value.bathrooms,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Minimum score for a pair to be persisted as a match
    #[serde(default = "default_min_match_score")]
    pub min_match_score: u8,
    /// How far below the asking price a requirement budget may be and still
    /// be considered a candidate
    #[serde(default = "default_prefilter_discount_pct")]
    pub prefilter_discount_pct: u32,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_match_score: default_min_match_score(),
            prefilter_discount_pct: default_prefilter_discount_pct(),
        }
    }
}

fn default_min_match_score() -> u8 { 40 }
fn default_prefilter_discount_pct() -> u32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct ValuationSettings {
    /// Currency the market-rate table is denominated in
    #[serde(default = "default_unit_currency")]
    pub unit_currency: String,
    /// Local currency per valuation unit, refreshed externally
    #[serde(default = "default_local_per_unit")]
    pub local_per_unit: Decimal,
    #[serde(default = "default_market_rate")]
    pub default_rate: Decimal,
    #[serde(default = "default_distressed_threshold_pct")]
    pub distressed_threshold_pct: Decimal,
    /// Ordered: the first zone contained in a property's comuna wins
    #[serde(default = "default_market_rates")]
    pub market_rates: Vec<MarketRate>,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        Self {
            unit_currency: default_unit_currency(),
            local_per_unit: default_local_per_unit(),
            default_rate: default_market_rate(),
            distressed_threshold_pct: default_distressed_threshold_pct(),
            market_rates: default_market_rates(),
        }
    }
}

fn default_unit_currency() -> String { "UF".to_string() }
fn default_local_per_unit() -> Decimal { Decimal::from(38_000) }
fn default_market_rate() -> Decimal { Decimal::from(50) }
fn default_distressed_threshold_pct() -> Decimal { Decimal::from(15) }

fn default_market_rates() -> Vec<MarketRate> {
    vec![
        MarketRate::new("las condes", 95),
        MarketRate::new("vitacura", 110),
        MarketRate::new("providencia", 90),
        MarketRate::new("lo barnechea", 100),
        MarketRate::new("temuco", 45),
        MarketRate::new("concon", 55),
    ]
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CANJE_)
    /// 5. DATABASE_URL, when set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CANJE__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path. Environment overrides and
    /// DATABASE_URL apply as in [`Settings::load`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_database_url(settings)?.try_deserialize()
    }

    pub fn scorer(&self) -> MatchScorer {
        MatchScorer::new(
            ScoringWeights::from(&self.scoring.weights),
            self.scoring.negotiation_tolerance_pct,
            Arc::new(SubstringLocationMatcher),
        )
    }

    pub fn analyzer(&self) -> DistressedAnalyzer {
        let valuation = &self.valuation;
        DistressedAnalyzer::new(
            MarketRateTable::new(valuation.market_rates.clone(), valuation.default_rate),
            &valuation.unit_currency,
            valuation.local_per_unit,
            valuation.distressed_threshold_pct,
        )
    }

    pub fn thresholds(&self) -> MatchingThresholds {
        MatchingThresholds::new(
            self.matching.min_match_score,
            self.matching.prefilter_discount_pct,
        )
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("CANJE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// DATABASE_URL takes precedence over the configured URL
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}
