//! Per-label metrics report
//!
//! Each selected label is computed independently; a failing label never
//! stops the others unless the policy is [`UnavailablePolicy::Halt`].

use crate::returns::{MetricsError, compute_returns_and_volatility, compute_sharpe_ratio};
use common::{PriceTable, Symbol};
use serde::Serialize;
use services_common::{AnalyticsConfig, UnavailablePolicy};
use tracing::{debug, warn};

/// Display label paired with the symbol it quotes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    /// Label shown to the user
    pub label: String,
    /// Symbol looked up in the price table
    pub symbol: Symbol,
}

impl Selection {
    pub fn new(label: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            label: label.into(),
            symbol,
        }
    }
}

/// Settings for one computation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSettings {
    /// Annual risk-free rate
    pub risk_free_rate: f64,
    /// Return periods per year
    pub trading_periods_per_year: u32,
    /// Outcome for labels whose metrics fail
    pub policy: UnavailablePolicy,
}

impl From<&AnalyticsConfig> for MetricsSettings {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            risk_free_rate: config.risk_free_rate,
            trading_periods_per_year: config.trading_periods_per_year,
            policy: config.unavailable_policy,
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

/// Computed metrics for one label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub label: String,
    pub symbol: Symbol,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
}

/// Outcome for one selected label
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsEntry {
    /// All three metrics are defined
    Computed(MetricsRow),
    /// Some metric could not be computed
    Unavailable {
        /// Label shown to the user
        label: String,
        /// First failure encountered
        reason: MetricsError,
    },
}

impl MetricsEntry {
    /// Display label of either variant
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Computed(row) => &row.label,
            Self::Unavailable { label, .. } => label,
        }
    }

    /// Row when computed
    #[must_use]
    pub const fn row(&self) -> Option<&MetricsRow> {
        match self {
            Self::Computed(row) => Some(row),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Metrics for a selection, in selection order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsReport {
    entries: Vec<MetricsEntry>,
}

impl MetricsReport {
    /// Compute one entry per selected label
    ///
    /// Labels whose symbol has no column in `table` are unavailable with
    /// `EmptySeries`, as are symbols whose column holds only gaps.
    ///
    /// # Errors
    /// The first failure, only under [`UnavailablePolicy::Halt`]
    pub fn build(
        selection: &[Selection],
        table: &PriceTable,
        settings: &MetricsSettings,
    ) -> Result<Self, MetricsError> {
        let mut entries = Vec::with_capacity(selection.len());

        for selected in selection {
            match compute_row(selected, table, settings) {
                Ok(row) => {
                    debug!(
                        label = %row.label,
                        symbol = %row.symbol,
                        annualized_return = row.annualized_return,
                        annualized_volatility = row.annualized_volatility,
                        sharpe_ratio = row.sharpe_ratio,
                        "Computed metrics"
                    );
                    entries.push(MetricsEntry::Computed(row));
                }
                Err(reason) => {
                    warn!(
                        label = %selected.label,
                        symbol = %selected.symbol,
                        %reason,
                        policy = ?settings.policy,
                        "Metrics unavailable"
                    );
                    match settings.policy {
                        UnavailablePolicy::NotAvailable => entries.push(MetricsEntry::Unavailable {
                            label: selected.label.clone(),
                            reason,
                        }),
                        UnavailablePolicy::Omit => {}
                        UnavailablePolicy::Halt => return Err(reason),
                    }
                }
            }
        }

        Ok(Self { entries })
    }

    /// Entries in selection order
    #[must_use]
    pub fn entries(&self) -> &[MetricsEntry] {
        &self.entries
    }

    /// Computed rows only
    pub fn rows(&self) -> impl Iterator<Item = &MetricsRow> {
        self.entries.iter().filter_map(MetricsEntry::row)
    }

    /// Entry for `label`
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&MetricsEntry> {
        self.entries.iter().find(|e| e.label() == label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn compute_row(
    selected: &Selection,
    table: &PriceTable,
    settings: &MetricsSettings,
) -> Result<MetricsRow, MetricsError> {
    let series = table.series(&selected.symbol);
    if series.is_empty() {
        return Err(MetricsError::EmptySeries {
            symbol: selected.symbol.to_string(),
        });
    }

    let (annualized_return, annualized_volatility) =
        compute_returns_and_volatility(&series, settings.trading_periods_per_year)?;
    let sharpe_ratio =
        compute_sharpe_ratio(annualized_return, annualized_volatility, settings.risk_free_rate)?;

    Ok(MetricsRow {
        label: selected.label.clone(),
        symbol: selected.symbol.clone(),
        annualized_return,
        annualized_volatility,
        sharpe_ratio,
    })
}
