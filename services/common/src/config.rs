//! Screener configuration

use crate::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_EQUITY_TICKERS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_INDEX_ALIASES,
    DEFAULT_RISK_FREE_RATE, DEFAULT_USER_AGENT, DEFAULT_YAHOO_BASE_URL,
    DIVIDEND_YIELD_PCT_BOUNDS, MARKET_CAP_BILLIONS_BOUNDS, PRICE_TO_BOOK_BOUNDS,
    TRADING_DAYS_PER_YEAR,
};
use crate::errors::ServiceError;
use common::{LookbackPeriod, Symbol, ValueRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level screener configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    /// Metric calculation settings
    pub analytics: AnalyticsConfig,
    /// Ticker universe
    pub universe: UniverseConfig,
    /// Market data source
    pub gateway: GatewayConfig,
    /// Initial filter slider ranges
    pub filters: FilterDefaults,
}

/// Metric calculation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Annual risk-free rate used for the Sharpe ratio
    pub risk_free_rate: f64,
    /// Return periods per year used to annualize
    pub trading_periods_per_year: u32,
    /// What to report for a symbol whose metrics cannot be computed
    pub unavailable_policy: UnavailablePolicy,
}

/// Reporting outcome for a symbol whose metrics failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailablePolicy {
    /// Keep the row and show it as not available
    #[default]
    NotAvailable,
    /// Drop the row
    Omit,
    /// Abort the whole computation pass
    Halt,
}

/// Ticker universe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Equity tickers to screen
    pub tickers: Vec<String>,
    /// Index display labels and the symbols they quote
    pub index_aliases: Vec<IndexAlias>,
    /// Historical window to fetch
    pub lookback: LookbackPeriod,
}

/// Display label for a quoted index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexAlias {
    /// Label shown to the user
    pub label: String,
    /// Symbol requested from the market data source
    pub symbol: String,
}

/// Market data source selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Which connector to use
    pub kind: GatewayKind,
    /// HTTP API base URL
    pub base_url: String,
    /// User agent header
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Directory holding `prices.csv` and `attributes.csv`
    pub data_dir: Option<PathBuf>,
}

/// Supported market data connectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayKind {
    /// Yahoo Finance HTTP API
    #[default]
    Yahoo,
    /// Local CSV files
    Csv,
}

/// Initial filter ranges, in the units shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterDefaults {
    /// Market capitalization in billions
    pub market_cap_billions: ValueRange,
    /// Price-to-book ratio
    pub price_to_book: ValueRange,
    /// Dividend yield in percent
    pub dividend_yield_pct: ValueRange,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            trading_periods_per_year: TRADING_DAYS_PER_YEAR,
            unavailable_policy: UnavailablePolicy::default(),
        }
    }
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_EQUITY_TICKERS.iter().map(|t| (*t).to_string()).collect(),
            index_aliases: DEFAULT_INDEX_ALIASES
                .iter()
                .map(|(label, symbol)| IndexAlias {
                    label: (*label).to_string(),
                    symbol: (*symbol).to_string(),
                })
                .collect(),
            lookback: LookbackPeriod::default(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: GatewayKind::default(),
            base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            data_dir: None,
        }
    }
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            market_cap_billions: ValueRange::new(
                MARKET_CAP_BILLIONS_BOUNDS.0,
                MARKET_CAP_BILLIONS_BOUNDS.1,
            ),
            price_to_book: ValueRange::new(PRICE_TO_BOOK_BOUNDS.0, PRICE_TO_BOOK_BOUNDS.1),
            dividend_yield_pct: ValueRange::new(
                DIVIDEND_YIELD_PCT_BOUNDS.0,
                DIVIDEND_YIELD_PCT_BOUNDS.1,
            ),
        }
    }
}

impl UniverseConfig {
    /// Equity symbols whose attributes are screened
    #[must_use]
    pub fn equity_symbols(&self) -> Vec<Symbol> {
        self.tickers.iter().map(Symbol::new).collect()
    }
}

impl ScreenerConfig {
    /// Load and validate configuration: the optional file, then
    /// `SCREENER__SECTION__KEY` environment overrides; anything unset keeps
    /// its default
    pub fn load(path: Option<&Path>) -> Result<Self, ServiceError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Same sources as [`ScreenerConfig::load`] without validation, for
    /// callers that adjust settings before validating
    pub fn read(path: Option<&Path>) -> Result<Self, ServiceError> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Reject settings the calculator or filter cannot work with
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.analytics.trading_periods_per_year == 0 {
            return Err(ServiceError::InvalidConfig(
                "analytics.trading_periods_per_year must be positive".to_string(),
            ));
        }
        if !self.analytics.risk_free_rate.is_finite() {
            return Err(ServiceError::InvalidConfig(
                "analytics.risk_free_rate must be finite".to_string(),
            ));
        }
        if self.universe.tickers.is_empty() && self.universe.index_aliases.is_empty() {
            return Err(ServiceError::InvalidConfig(
                "universe must name at least one ticker or index".to_string(),
            ));
        }
        if let Some(alias) = self
            .universe
            .index_aliases
            .iter()
            .find(|a| a.label.trim().is_empty() || a.symbol.trim().is_empty())
        {
            return Err(ServiceError::InvalidConfig(format!(
                "index alias {alias:?} needs both a label and a symbol"
            )));
        }
        for (name, range) in [
            ("market_cap_billions", &self.filters.market_cap_billions),
            ("price_to_book", &self.filters.price_to_book),
            ("dividend_yield_pct", &self.filters.dividend_yield_pct),
        ] {
            if !range.is_well_formed() {
                return Err(ServiceError::InvalidConfig(format!(
                    "filters.{name} has min {} above max {}",
                    range.min, range.max
                )));
            }
        }
        if self.gateway.kind == GatewayKind::Csv && self.gateway.data_dir.is_none() {
            return Err(ServiceError::InvalidConfig(
                "gateway.data_dir is required for the csv gateway".to_string(),
            ));
        }
        Ok(())
    }
}
