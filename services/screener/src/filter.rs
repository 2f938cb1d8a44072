//! Universe filter
//!
//! Ranges are given in the units the user sees: market cap in billions and
//! dividend yield in percent. Missing price-to-book and dividend yield values
//! never exclude a record.

use common::{AttributeRecord, ValueRange};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use services_common::{ALL_SECTORS, BILLION, FilterDefaults, PERCENT};

/// Filter settings chosen by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Market cap range in billions
    pub market_cap_billions: ValueRange,
    /// Price-to-book range
    pub price_to_book: ValueRange,
    /// Dividend yield range in percent
    pub dividend_yield_pct: ValueRange,
    /// Selected sectors; empty or containing `"All"` selects every sector
    pub sectors: Vec<String>,
}

impl From<&FilterDefaults> for FilterCriteria {
    fn from(defaults: &FilterDefaults) -> Self {
        Self {
            market_cap_billions: defaults.market_cap_billions,
            price_to_book: defaults.price_to_book,
            dividend_yield_pct: defaults.dividend_yield_pct,
            sectors: vec![ALL_SECTORS.to_string()],
        }
    }
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::from(&FilterDefaults::default())
    }
}

impl FilterCriteria {
    /// Whether every range has `min <= max`
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.market_cap_billions.is_well_formed()
            && self.price_to_book.is_well_formed()
            && self.dividend_yield_pct.is_well_formed()
    }

    /// Whether the sector selection expands to every sector
    #[must_use]
    pub fn selects_all_sectors(&self) -> bool {
        self.sectors.is_empty() || self.sectors.iter().any(|s| s == ALL_SECTORS)
    }

    /// Whether `record` passes every criterion except the sector check
    #[must_use]
    pub fn matches_ranges(&self, record: &AttributeRecord) -> bool {
        let yield_range = ValueRange::new(
            self.dividend_yield_pct.min / PERCENT,
            self.dividend_yield_pct.max / PERCENT,
        );

        self.market_cap_billions.contains(record.market_cap / BILLION)
            && record
                .price_to_book
                .is_none_or(|pb| self.price_to_book.contains(pb))
            && record
                .dividend_yield
                .is_none_or(|dy| yield_range.contains(dy))
    }
}

/// Distinct sectors present in `records`, sorted
#[must_use]
pub fn available_sectors(records: &[AttributeRecord]) -> Vec<String> {
    let mut sectors: Vec<String> = records
        .iter()
        .map(|r| r.sector.as_str())
        .collect::<FxHashSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    sectors.sort();
    sectors
}

/// Records passing `criteria`, sorted by descending market cap
///
/// Records with equal market cap keep their input order. Any inverted range
/// yields an empty result.
#[must_use]
pub fn filter_universe(
    records: &[AttributeRecord],
    criteria: &FilterCriteria,
) -> Vec<AttributeRecord> {
    if !criteria.is_well_formed() {
        tracing::debug!(?criteria, "Inverted filter range; nothing matches");
        return Vec::new();
    }

    let all_sectors = criteria.selects_all_sectors();
    let sectors: FxHashSet<&str> = criteria.sectors.iter().map(String::as_str).collect();

    let mut passed: Vec<AttributeRecord> = records
        .iter()
        .filter(|r| all_sectors || sectors.contains(r.sector.as_str()))
        .filter(|r| criteria.matches_ranges(r))
        .cloned()
        .collect();

    passed.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));
    passed
}
