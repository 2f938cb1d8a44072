//! Session cache in front of a market data gateway
//!
//! Price tables are memoized per `(sorted ticker set, lookback)` and
//! attribute records per symbol. Entries live until [`CachedGateway::clear`]
//! is called at the end of a session; failures are never cached.

use crate::{GatewayError, MarketDataGateway};
use async_trait::async_trait;
use common::{AttributeRecord, LookbackPeriod, PriceTable, Symbol};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one price download
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    symbols: Vec<Symbol>,
    lookback: LookbackPeriod,
}

impl CacheKey {
    /// Key for a request; symbol order and duplicates do not matter
    #[must_use]
    pub fn new(symbols: &[Symbol], lookback: LookbackPeriod) -> Self {
        let mut symbols = symbols.to_vec();
        symbols.sort();
        symbols.dedup();
        Self { symbols, lookback }
    }

    /// Sorted, de-duplicated symbols
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Requested window
    #[must_use]
    pub const fn lookback(&self) -> LookbackPeriod {
        self.lookback
    }
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from memory
    pub hits: u64,
    /// Requests forwarded to the gateway
    pub misses: u64,
}

/// Memoizing wrapper around any [`MarketDataGateway`]
pub struct CachedGateway<G> {
    inner: G,
    prices: Mutex<FxHashMap<CacheKey, Arc<PriceTable>>>,
    attributes: Mutex<FxHashMap<Symbol, AttributeRecord>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<G> std::fmt::Debug for CachedGateway<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedGateway")
            .field("price_tables", &self.prices.lock().len())
            .field("attribute_records", &self.attributes.lock().len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl<G> CachedGateway<G> {
    /// Wrap `inner` with an empty cache
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            prices: Mutex::new(FxHashMap::default()),
            attributes: Mutex::new(FxHashMap::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Drop every cached entry; called at session end
    pub fn clear(&self) {
        let tables = {
            let mut prices = self.prices.lock();
            let n = prices.len();
            prices.clear();
            n
        };
        let records = {
            let mut attributes = self.attributes.lock();
            let n = attributes.len();
            attributes.clear();
            n
        };
        tracing::info!(tables, records, "Market data cache cleared");
    }

    /// Current hit and miss counts
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Wrapped gateway
    pub const fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: MarketDataGateway> CachedGateway<G> {
    /// Shared price table for the request, downloading it on first use
    pub async fn prices(
        &self,
        symbols: &[Symbol],
        lookback: LookbackPeriod,
    ) -> Result<Arc<PriceTable>, GatewayError> {
        let key = CacheKey::new(symbols, lookback);

        if let Some(table) = self.prices.lock().get(&key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(symbols = key.symbols.len(), %lookback, "Price table cache hit");
            return Ok(table);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(symbols = key.symbols.len(), %lookback, "Price table cache miss");

        let table = Arc::new(self.inner.fetch_adjusted_close(key.symbols(), lookback).await?);
        self.prices.lock().insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Attribute record for `symbol`, downloading it on first use
    pub async fn attributes(&self, symbol: &Symbol) -> Result<AttributeRecord, GatewayError> {
        if let Some(record) = self.attributes.lock().get(symbol).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(record);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let record = self.inner.fetch_attributes(symbol).await?;
        self.attributes
            .lock()
            .insert(symbol.clone(), record.clone());
        Ok(record)
    }
}

#[async_trait]
impl<G: MarketDataGateway> MarketDataGateway for CachedGateway<G> {
    async fn fetch_adjusted_close(
        &self,
        symbols: &[Symbol],
        lookback: LookbackPeriod,
    ) -> Result<PriceTable, GatewayError> {
        self.prices(symbols, lookback).await.map(|t| (*t).clone())
    }

    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<AttributeRecord, GatewayError> {
        self.attributes(symbol).await
    }
}
