//! Metrics report tests

use approx::assert_relative_eq;
use common::{PriceTable, Symbol};
use pretty_assertions::assert_eq;
use reporting::{MetricsEntry, MetricsError, MetricsReport, MetricsSettings, Selection};
use rstest::*;
use services_common::UnavailablePolicy;
use test_utils::{SeriesFactory, sample_price_table, table_from};

#[fixture]
fn settings() -> MetricsSettings {
    MetricsSettings::default()
}

#[fixture]
fn mixed_table() -> PriceTable {
    table_from([
        SeriesFactory::new("AAPL").build(&[185.0, 184.0, 181.5, 181.2]),
        SeriesFactory::new("FLAT").build(&[10.0, 10.0, 10.0, 10.0]),
        SeriesFactory::new("NEW").build(&[30.0]),
    ])
}

fn select(pairs: &[(&str, &str)]) -> Vec<Selection> {
    pairs
        .iter()
        .map(|(label, symbol)| Selection::new(*label, Symbol::new(symbol)))
        .collect()
}

#[rstest]
fn test_default_settings_match_reference_constants(settings: MetricsSettings) {
    assert_relative_eq!(settings.risk_free_rate, 0.045);
    assert_eq!(settings.trading_periods_per_year, 252);
    assert_eq!(settings.policy, UnavailablePolicy::NotAvailable);
}

#[rstest]
fn test_index_labels_resolve_to_symbols(sample_price_table: PriceTable, settings: MetricsSettings) {
    let selection = select(&[
        ("S&P 500 Index", "^GSPC"),
        ("Nasdaq Composite Index", "^IXIC"),
    ]);
    let report = MetricsReport::build(&selection, &sample_price_table, &settings).unwrap();

    let labels: Vec<&str> = report.entries().iter().map(MetricsEntry::label).collect();
    assert_eq!(labels, vec!["S&P 500 Index", "Nasdaq Composite Index"]);
    assert_eq!(report.rows().count(), 2);

    let row = report.get("S&P 500 Index").and_then(MetricsEntry::row).unwrap();
    assert_eq!(row.symbol, Symbol::new("^GSPC"));
    assert_relative_eq!(
        row.sharpe_ratio,
        (row.annualized_return - 0.045) / row.annualized_volatility,
        max_relative = 1e-12
    );
}

#[rstest]
fn test_failures_are_isolated_per_label(mixed_table: PriceTable, settings: MetricsSettings) {
    let selection = select(&[
        ("AAPL", "AAPL"),
        ("FLAT", "FLAT"),
        ("NEW", "NEW"),
        ("GONE", "GONE"),
    ]);
    let report = MetricsReport::build(&selection, &mixed_table, &settings).unwrap();

    assert_eq!(report.len(), 4);
    assert!(matches!(report.entries()[0], MetricsEntry::Computed(_)));
    assert_eq!(
        report.entries()[1],
        MetricsEntry::Unavailable {
            label: "FLAT".to_string(),
            reason: MetricsError::DivisionByZero,
        }
    );
    assert!(matches!(
        &report.entries()[2],
        MetricsEntry::Unavailable { reason: MetricsError::InsufficientData { .. }, .. }
    ));
    assert!(matches!(
        &report.entries()[3],
        MetricsEntry::Unavailable { reason: MetricsError::EmptySeries { symbol }, .. } if symbol == "GONE"
    ));
}

#[rstest]
fn test_omit_policy_drops_failed_labels(mixed_table: PriceTable, mut settings: MetricsSettings) {
    settings.policy = UnavailablePolicy::Omit;
    let selection = select(&[("FLAT", "FLAT"), ("AAPL", "AAPL"), ("GONE", "GONE")]);
    let report = MetricsReport::build(&selection, &mixed_table, &settings).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.entries()[0].label(), "AAPL");
}

#[rstest]
fn test_halt_policy_stops_at_first_failure(mixed_table: PriceTable, mut settings: MetricsSettings) {
    settings.policy = UnavailablePolicy::Halt;
    let selection = select(&[("AAPL", "AAPL"), ("FLAT", "FLAT"), ("GONE", "GONE")]);

    assert_eq!(
        MetricsReport::build(&selection, &mixed_table, &settings),
        Err(MetricsError::DivisionByZero)
    );
}

#[rstest]
fn test_empty_selection(mixed_table: PriceTable, settings: MetricsSettings) {
    let report = MetricsReport::build(&[], &mixed_table, &settings).unwrap();
    assert!(report.is_empty());
}

#[rstest]
fn test_gaps_are_dropped_before_computing(sample_price_table: PriceTable, settings: MetricsSettings) {
    let selection = select(&[("MSFT", "MSFT")]);
    let report = MetricsReport::build(&selection, &sample_price_table, &settings).unwrap();
    let row = report.rows().next().unwrap();

    // 400 -> 404 -> 398 -> 410 -> 415, the missing day skipped
    let expected_growth: f64 = 415.0 / 400.0;
    assert_relative_eq!(
        row.annualized_return,
        expected_growth.powf(252.0 / 4.0) - 1.0,
        max_relative = 1e-9
    );
}
