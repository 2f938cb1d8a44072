//! Cumulative-change chart model and exports

use crate::metrics::Selection;
use crate::returns::{CumulativePoint, compute_cumulative_return};
use chrono::NaiveDate;
use common::PriceTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Chart title
pub const CHART_TITLE: &str = "Stock Cumulative Change";
/// Horizontal axis title
pub const X_AXIS_TITLE: &str = "Date";
/// Vertical axis title
pub const Y_AXIS_TITLE: &str = "Cumulative Change";
/// Legend title
pub const LEGEND_TITLE: &str = "Tickers";

/// Chart export failures
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One line of the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLine {
    /// Legend entry
    pub label: String,
    /// Points in date order
    pub points: Vec<CumulativePoint>,
}

/// Cumulative change of every selected label on a shared date axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeChart {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub legend_title: String,
    pub lines: Vec<ChartLine>,
}

impl Default for CumulativeChart {
    fn default() -> Self {
        Self {
            title: CHART_TITLE.to_string(),
            x_axis_title: X_AXIS_TITLE.to_string(),
            y_axis_title: Y_AXIS_TITLE.to_string(),
            legend_title: LEGEND_TITLE.to_string(),
            lines: Vec::new(),
        }
    }
}

impl CumulativeChart {
    /// One line per label, rebased to its own first observation
    ///
    /// Labels with no usable series are left out of the chart.
    #[must_use]
    pub fn build(selection: &[Selection], table: &PriceTable) -> Self {
        let mut chart = Self::default();

        for selected in selection {
            match compute_cumulative_return(&table.series(&selected.symbol)) {
                Ok(series) => chart.lines.push(ChartLine {
                    label: selected.label.clone(),
                    points: series.points().to_vec(),
                }),
                Err(reason) => {
                    warn!(label = %selected.label, %reason, "Leaving label out of chart");
                }
            }
        }

        chart
    }

    /// Labels in legend order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.label.as_str())
    }

    /// Union of every line's dates, ascending
    #[must_use]
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .lines
            .iter()
            .flat_map(|l| l.points.iter().map(|p| p.date))
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Pretty-printed JSON document
    ///
    /// # Errors
    /// When serialization fails
    pub fn to_json(&self) -> Result<String, ChartError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Wide CSV: a `date` column then one column per line, blank where a
    /// line has no point on that date
    ///
    /// # Errors
    /// When writing to `writer` fails
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ChartError> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec![X_AXIS_TITLE.to_lowercase()];
        header.extend(self.labels().map(str::to_string));
        csv.write_record(&header)?;

        let by_date: Vec<BTreeMap<NaiveDate, f64>> = self
            .lines
            .iter()
            .map(|l| l.points.iter().map(|p| (p.date, p.value)).collect())
            .collect();

        for date in self.dates() {
            let mut record = Vec::with_capacity(by_date.len() + 1);
            record.push(date.format("%Y-%m-%d").to_string());
            record.extend(
                by_date
                    .iter()
                    .map(|line| line.get(&date).map(f64::to_string).unwrap_or_default()),
            );
            csv.write_record(&record)?;
        }

        csv.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Write the JSON document to `path`
    ///
    /// # Errors
    /// When serialization or the file write fails
    pub fn export_json(&self, path: &Path) -> Result<(), ChartError> {
        std::fs::write(path, self.to_json()?).map_err(|source| io_error(path, source))?;
        info!(path = %path.display(), lines = self.lines.len(), "Wrote chart JSON");
        Ok(())
    }

    /// Write the wide CSV to `path`
    ///
    /// # Errors
    /// When the file cannot be created or written
    pub fn export_csv(&self, path: &Path) -> Result<(), ChartError> {
        let file = std::fs::File::create(path).map_err(|source| io_error(path, source))?;
        self.write_csv(file)?;
        info!(path = %path.display(), lines = self.lines.len(), "Wrote chart CSV");
        Ok(())
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ChartError {
    ChartError::Io {
        path: path.display().to_string(),
        source,
    }
}
