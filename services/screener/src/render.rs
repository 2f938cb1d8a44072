//! Plain-text tables for the terminal

use crate::session::Screening;
use crate::universe::Universe;
use reporting::{MetricsEntry, MetricsReport};
use services_common::{BILLION, PERCENT};
use std::fmt::Write;

/// Marker for a value that is missing or could not be computed
pub const NOT_AVAILABLE: &str = "N/A";

/// Summary table of filtered stocks, titled with the row count
#[must_use]
pub fn render_summary(screening: &Screening) -> String {
    let records = &screening.records;
    let mut out = format!("Summary of {} Filtered Stocks\n", records.len());

    let name_width = column_width(records.iter().map(|r| r.name.as_str()), "Name");
    let sector_width = column_width(records.iter().map(|r| r.sector.as_str()), "Sector");

    let _ = writeln!(
        out,
        "{:<8} {:<name_width$} {:<sector_width$} {:>16} {:>10} {:>15}",
        "Symbol", "Name", "Sector", "Market Cap ($B)", "P/B", "Dividend Yield"
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:<8} {:<name_width$} {:<sector_width$} {:>16.2} {:>10} {:>15}",
            record.symbol.as_str(),
            record.name,
            record.sector,
            record.market_cap / BILLION,
            optional(record.price_to_book, |v| format!("{v:.2}")),
            optional(record.dividend_yield, |v| format!("{:.2}%", v * PERCENT)),
        );
    }

    let _ = writeln!(
        out,
        "\n{} of {} stocks passed; sectors: {}",
        records.len(),
        screening.universe_size,
        screening.sectors.join(", ")
    );
    out
}

/// Metrics table keyed by display label
///
/// Unavailable labels show `N/A` in every metric column and the reason last.
#[must_use]
pub fn render_metrics(report: &MetricsReport) -> String {
    let mut out = String::from("Stock Metrics\n");
    let label_width = column_width(report.entries().iter().map(MetricsEntry::label), "Ticker");

    let _ = writeln!(
        out,
        "{:<label_width$} {:>20} {:>22} {:>13}  Note",
        "Ticker", "Annualized Returns", "Annualized Volatility", "Sharpe Ratio"
    );
    for entry in report.entries() {
        match entry {
            MetricsEntry::Computed(row) => {
                let _ = writeln!(
                    out,
                    "{:<label_width$} {:>20.4} {:>22.4} {:>13.4}",
                    row.label, row.annualized_return, row.annualized_volatility, row.sharpe_ratio
                );
            }
            MetricsEntry::Unavailable { label, reason } => {
                let _ = writeln!(
                    out,
                    "{label:<label_width$} {NOT_AVAILABLE:>20} {NOT_AVAILABLE:>22} {NOT_AVAILABLE:>13}  {reason}"
                );
            }
        }
    }
    out
}

/// Configured tickers and index labels
#[must_use]
pub fn render_universe(universe: &Universe) -> String {
    let mut out = format!("Equities ({}):\n", universe.equities().len());
    let tickers: Vec<&str> = universe.equities().iter().map(|s| s.as_str()).collect();
    for chunk in tickers.chunks(10) {
        let _ = writeln!(out, "  {}", chunk.join(" "));
    }

    let _ = writeln!(out, "Indices ({}):", universe.indices().len());
    for index in universe.indices() {
        let _ = writeln!(out, "  {:<28} {}", index.label, index.symbol);
    }
    out
}

fn optional(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format)
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}
