//! Mock services and components for testing

use async_trait::async_trait;
use common::{AttributeRecord, LookbackPeriod, PriceTable, Symbol};
use market_connector::{GatewayError, MarketDataGateway};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory market data gateway that counts its calls
///
/// Prices are served from one table regardless of lookback; symbols without
/// a column come back as all-gap columns. Attribute lookups fail with
/// `UnknownSymbol` for unregistered symbols and with `Status` for symbols
/// marked as failing.
pub struct MockGateway {
    prices: PriceTable,
    attributes: HashMap<Symbol, AttributeRecord>,
    failing: Arc<RwLock<HashSet<Symbol>>>,
    price_calls: AtomicUsize,
    attribute_calls: AtomicUsize,
}

impl std::fmt::Debug for MockGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGateway")
            .field("dates", &self.prices.len())
            .field("attributes", &self.attributes.len())
            .field("price_calls", &self.price_calls())
            .field("attribute_calls", &self.attribute_calls())
            .finish()
    }
}

impl MockGateway {
    /// Gateway over `prices` and `attributes`
    pub fn new(prices: PriceTable, attributes: impl IntoIterator<Item = AttributeRecord>) -> Self {
        Self {
            prices,
            attributes: attributes
                .into_iter()
                .map(|r| (r.symbol.clone(), r))
                .collect(),
            failing: Arc::new(RwLock::new(HashSet::new())),
            price_calls: AtomicUsize::new(0),
            attribute_calls: AtomicUsize::new(0),
        }
    }

    /// Make attribute lookups for `symbol` fail with HTTP 503
    pub async fn fail_attributes_for(&self, symbol: impl AsRef<str>) {
        self.failing.write().await.insert(Symbol::new(symbol));
    }

    /// Number of price downloads served
    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    /// Number of attribute lookups served, failed ones included
    pub fn attribute_calls(&self) -> usize {
        self.attribute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataGateway for MockGateway {
    async fn fetch_adjusted_close(
        &self,
        symbols: &[Symbol],
        _lookback: LookbackPeriod,
    ) -> Result<PriceTable, GatewayError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.prices.select(symbols))
    }

    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<AttributeRecord, GatewayError> {
        self.attribute_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.read().await.contains(symbol) {
            return Err(GatewayError::Status {
                symbol: symbol.to_string(),
                status: 503,
            });
        }
        self.attributes
            .get(symbol)
            .cloned()
            .ok_or_else(|| GatewayError::UnknownSymbol(symbol.to_string()))
    }
}
