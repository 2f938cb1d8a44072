//! Ticker universe and display-label resolution

use common::{AttributeRecord, Symbol};
use reporting::Selection;
use rustc_hash::FxHashSet;
use services_common::UniverseConfig;

/// Index shown under a display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexLabel {
    pub label: String,
    pub symbol: Symbol,
}

/// Equities to screen plus the labelled indices to compare against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    equities: Vec<Symbol>,
    indices: Vec<IndexLabel>,
}

impl From<&UniverseConfig> for Universe {
    fn from(config: &UniverseConfig) -> Self {
        Self::new(
            config.equity_symbols(),
            config
                .index_aliases
                .iter()
                .map(|a| IndexLabel {
                    label: a.label.trim().to_string(),
                    symbol: Symbol::new(&a.symbol),
                }),
        )
    }
}

impl Universe {
    /// Universe with duplicate equities removed, first occurrence kept
    pub fn new(equities: Vec<Symbol>, indices: impl IntoIterator<Item = IndexLabel>) -> Self {
        let mut seen = FxHashSet::default();
        let equities = equities
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self {
            equities,
            indices: indices.into_iter().collect(),
        }
    }

    /// Equities whose attributes are screened
    #[must_use]
    pub fn equities(&self) -> &[Symbol] {
        &self.equities
    }

    /// Labelled indices
    #[must_use]
    pub fn indices(&self) -> &[IndexLabel] {
        &self.indices
    }

    /// Every symbol to download prices for: equities, then indices
    #[must_use]
    pub fn price_symbols(&self) -> Vec<Symbol> {
        self.equities
            .iter()
            .cloned()
            .chain(self.indices.iter().map(|i| i.symbol.clone()))
            .collect()
    }

    /// Index labels, the selection shown before the user picks anything
    #[must_use]
    pub fn default_labels(&self) -> Vec<String> {
        self.indices.iter().map(|i| i.label.clone()).collect()
    }

    /// Labels the user may compare: filtered tickers first, then index labels
    #[must_use]
    pub fn selectable_labels(&self, filtered: &[AttributeRecord]) -> Vec<String> {
        filtered
            .iter()
            .map(|r| r.symbol.to_string())
            .chain(self.default_labels())
            .collect()
    }

    /// Symbol quoted under `label`: the aliased index, or the label read as a ticker
    #[must_use]
    pub fn resolve(&self, label: &str) -> Symbol {
        let label = label.trim();
        self.indices
            .iter()
            .find(|i| i.label == label)
            .map_or_else(|| Symbol::new(label), |i| i.symbol.clone())
    }

    /// Resolved selection in input order with repeated labels dropped
    #[must_use]
    pub fn selection(&self, labels: &[String]) -> Vec<Selection> {
        let mut seen = FxHashSet::default();
        labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty() && seen.insert(l.to_string()))
            .map(|l| Selection::new(l, self.resolve(l)))
            .collect()
    }
}
