//! Market Connector Service
//!
//! Fetches adjusted closing prices and static company attributes from a
//! market data source and caches them for the rest of a session.

pub mod cache;
pub mod connectors;
pub mod exchanges;

pub use cache::{CacheKey, CacheStats, CachedGateway};
pub use connectors::CsvConnector;
pub use exchanges::yahoo::YahooConnector;

use async_trait::async_trait;
use common::{AttributeRecord, DataError, LookbackPeriod, PriceTable, Symbol};
use services_common::{GatewayConfig, GatewayKind};
use std::path::PathBuf;
use thiserror::Error;

/// Source of historical prices and company attributes
///
/// Implementations report gaps rather than fabricated values: non-trading
/// days and delisted symbols are absent from the returned table, and a
/// symbol with no data at all yields an all-gap column.
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Adjusted closes for `symbols` over `lookback`, aligned on trading dates
    async fn fetch_adjusted_close(
        &self,
        symbols: &[Symbol],
        lookback: LookbackPeriod,
    ) -> Result<PriceTable, GatewayError>;

    /// Static attributes of one symbol
    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<AttributeRecord, GatewayError>;
}

#[async_trait]
impl<G: MarketDataGateway + ?Sized> MarketDataGateway for Box<G> {
    async fn fetch_adjusted_close(
        &self,
        symbols: &[Symbol],
        lookback: LookbackPeriod,
    ) -> Result<PriceTable, GatewayError> {
        (**self).fetch_adjusted_close(symbols, lookback).await
    }

    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<AttributeRecord, GatewayError> {
        (**self).fetch_attributes(symbol).await
    }
}

/// Market data gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// Request failed before a response arrived
    #[error("{symbol}: request failed: {source}")]
    Http {
        /// Requested symbol
        symbol: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Source answered with a non-success status
    #[error("{symbol}: market data source returned HTTP {status}")]
    Status {
        /// Requested symbol
        symbol: String,
        /// HTTP status code
        status: u16,
    },

    /// Response body could not be decoded
    #[error("{symbol}: could not decode response: {message}")]
    Decode {
        /// Requested symbol
        symbol: String,
        /// Decoder message
        message: String,
    },

    /// Response lacks a required attribute
    #[error("{symbol}: response is missing {field}")]
    MissingField {
        /// Requested symbol
        symbol: String,
        /// Missing field name
        field: &'static str,
    },

    /// Source has never heard of the symbol
    #[error("{0}: unknown symbol")]
    UnknownSymbol(String),

    /// Local data file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Local CSV file is malformed
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: csv::Error,
    },

    /// Data violates a table or series invariant
    #[error(transparent)]
    Data(#[from] DataError),

    /// Gateway settings are unusable
    #[error("gateway misconfigured: {0}")]
    Config(String),
}

/// Build the connector selected by `config`
pub fn connect(config: &GatewayConfig) -> Result<Box<dyn MarketDataGateway>, GatewayError> {
    match config.kind {
        GatewayKind::Yahoo => {
            tracing::info!(base_url = %config.base_url, "Using Yahoo Finance market data");
            Ok(Box::new(YahooConnector::new(config)?))
        }
        GatewayKind::Csv => {
            let dir = config.data_dir.as_deref().ok_or_else(|| {
                GatewayError::Config("data_dir is required for the csv gateway".to_string())
            })?;
            tracing::info!(data_dir = %dir.display(), "Using CSV market data");
            Ok(Box::new(CsvConnector::open(dir)?))
        }
    }
}
