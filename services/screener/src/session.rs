//! Dashboard session
//!
//! One session owns a market data cache. Every user interaction runs a full
//! pass (screen, then compare) against the cached downloads; the cache is
//! dropped by [`Dashboard::end_session`].

use crate::filter::{FilterCriteria, available_sectors, filter_universe};
use crate::universe::Universe;
use crate::ScreenerError;
use common::{AttributeRecord, LookbackPeriod, PriceTable};
use market_connector::{CachedGateway, GatewayError, MarketDataGateway};
use reporting::{CumulativeChart, MetricsReport, MetricsSettings, Selection};
use rustc_hash::FxHashSet;
use services_common::ScreenerConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of applying a filter to the universe
#[derive(Debug, Clone, PartialEq)]
pub struct Screening {
    /// Records that passed, by descending market cap
    pub records: Vec<AttributeRecord>,
    /// Every sector present in the universe
    pub sectors: Vec<String>,
    /// Records available before filtering
    pub universe_size: usize,
    /// Labels the user may compare
    pub selectable: Vec<String>,
}

/// Metrics and chart for one selection
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Labels compared, with their symbols
    pub selection: Vec<Selection>,
    /// Metrics per label
    pub report: MetricsReport,
    /// Cumulative change per label
    pub chart: CumulativeChart,
}

impl Comparison {
    /// Write the chart to the requested files
    ///
    /// # Errors
    /// `Chart` when a file cannot be created or written
    pub fn export(&self, json: Option<&Path>, csv: Option<&Path>) -> Result<(), ScreenerError> {
        if let Some(path) = json {
            self.chart.export_json(path)?;
        }
        if let Some(path) = csv {
            self.chart.export_csv(path)?;
        }
        Ok(())
    }
}

/// Screener session over one market data gateway
pub struct Dashboard<G> {
    gateway: CachedGateway<G>,
    universe: Universe,
    lookback: LookbackPeriod,
    settings: MetricsSettings,
}

impl<G> std::fmt::Debug for Dashboard<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("gateway", &self.gateway)
            .field("universe", &self.universe)
            .field("lookback", &self.lookback)
            .field("settings", &self.settings)
            .finish()
    }
}

impl<G: MarketDataGateway> Dashboard<G> {
    /// Start a session with an empty cache
    pub fn new(gateway: G, config: &ScreenerConfig) -> Self {
        Self {
            gateway: CachedGateway::new(gateway),
            universe: Universe::from(&config.universe),
            lookback: config.universe.lookback,
            settings: MetricsSettings::from(&config.analytics),
        }
    }

    /// Configured universe
    #[must_use]
    pub const fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Session cache
    #[must_use]
    pub const fn gateway(&self) -> &CachedGateway<G> {
        &self.gateway
    }

    /// Attribute records for every equity in the universe
    ///
    /// Symbols whose attributes cannot be fetched are left out with a warning.
    pub async fn attributes(&self) -> Vec<AttributeRecord> {
        let mut records = Vec::with_capacity(self.universe.equities().len());
        for symbol in self.universe.equities() {
            match self.gateway.attributes(symbol).await {
                Ok(record) => records.push(record),
                Err(error) => warn!(%symbol, %error, "Skipping symbol without attributes"),
            }
        }
        records
    }

    /// Adjusted closes for the whole universe over the configured lookback
    pub async fn prices(&self) -> Result<Arc<PriceTable>, GatewayError> {
        self.gateway
            .prices(&self.universe.price_symbols(), self.lookback)
            .await
    }

    /// Apply `criteria` to the universe
    pub async fn screen(&self, criteria: &FilterCriteria) -> Screening {
        let universe = self.attributes().await;
        let records = filter_universe(&universe, criteria);

        info!(
            passed = records.len(),
            universe = universe.len(),
            "Screened universe"
        );

        Screening {
            sectors: available_sectors(&universe),
            selectable: self.universe.selectable_labels(&records),
            universe_size: universe.len(),
            records,
        }
    }

    /// Screen with `criteria`, then compare the chosen labels
    ///
    /// An empty `labels` selects the index labels. Labels that are neither a
    /// filtered ticker nor an index label are ignored with a warning.
    ///
    /// # Errors
    /// A gateway failure while downloading prices, or the first metric
    /// failure under the halt policy
    pub async fn compare(
        &self,
        criteria: &FilterCriteria,
        labels: &[String],
    ) -> Result<Comparison, ScreenerError> {
        let screening = self.screen(criteria).await;

        let requested = if labels.is_empty() {
            self.universe.default_labels()
        } else {
            labels.to_vec()
        };
        let allowed: FxHashSet<&str> = screening.selectable.iter().map(String::as_str).collect();
        let (kept, ignored): (Vec<String>, Vec<String>) = requested
            .into_iter()
            .partition(|l| allowed.contains(l.trim()));
        for label in &ignored {
            warn!(%label, "Not a filtered ticker or index label; ignored");
        }

        let selection = self.universe.selection(&kept);
        let table = self.prices().await?;
        let report = MetricsReport::build(&selection, &table, &self.settings)?;
        let chart = CumulativeChart::build(&selection, &table);

        info!(
            selected = selection.len(),
            computed = report.rows().count(),
            lines = chart.lines.len(),
            "Compared selection"
        );

        Ok(Comparison {
            selection,
            report,
            chart,
        })
    }

    /// Drop every cached download
    pub fn end_session(&self) {
        let stats = self.gateway.stats();
        info!(hits = stats.hits, misses = stats.misses, "Ending session");
        self.gateway.clear();
    }
}
