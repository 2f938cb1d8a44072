//! Return and risk calculation tests

use approx::assert_relative_eq;
use common::{PricePoint, PriceSeries, Symbol};
use proptest::prelude::*;
use reporting::{
    MetricsError, compute_cumulative_return, compute_returns_and_volatility, compute_sharpe_ratio,
};
use rstest::*;
use test_utils::{
    SeriesFactory, assert_approx_eq, assert_bit_identical, assert_error_contains,
    compounding_series, constant_series, date,
};

const PERIODS: u32 = 252;
const RISK_FREE: f64 = 0.045;

#[rstest]
fn test_compounding_series_end_to_end(compounding_series: PriceSeries) {
    let (annualized_return, annualized_volatility) =
        compute_returns_and_volatility(&compounding_series, PERIODS).unwrap();

    assert_relative_eq!(
        annualized_return,
        1.21_f64.powf(126.0) - 1.0,
        max_relative = 1e-12
    );
    assert_eq!(annualized_volatility, 0.0);
    assert_eq!(
        compute_sharpe_ratio(annualized_return, annualized_volatility, RISK_FREE),
        Err(MetricsError::DivisionByZero)
    );
}

#[rstest]
fn test_constant_series_is_flat(constant_series: PriceSeries) {
    let metrics = compute_returns_and_volatility(&constant_series, PERIODS).unwrap();
    assert_eq!(metrics, (0.0, 0.0));
    assert_eq!(
        compute_sharpe_ratio(metrics.0, metrics.1, RISK_FREE),
        Err(MetricsError::DivisionByZero)
    );

    let cumulative = compute_cumulative_return(&constant_series).unwrap();
    assert!(cumulative.values().all(|v| v == 0.0));
}

#[test]
fn test_known_volatility() {
    // Returns +10%, -10%: sample deviation is sqrt(0.02)
    let series = SeriesFactory::new("SWING").build(&[100.0, 110.0, 99.0]);
    let (annualized_return, annualized_volatility) =
        compute_returns_and_volatility(&series, PERIODS).unwrap();

    assert_relative_eq!(annualized_return, 0.99_f64.powf(126.0) - 1.0, max_relative = 1e-9);
    assert_relative_eq!(
        annualized_volatility,
        0.02_f64.sqrt() * 252.0_f64.sqrt(),
        max_relative = 1e-9
    );

    let sharpe = compute_sharpe_ratio(annualized_return, annualized_volatility, RISK_FREE).unwrap();
    assert_relative_eq!(
        sharpe,
        (annualized_return - RISK_FREE) / annualized_volatility,
        max_relative = 1e-12
    );
}

#[rstest]
#[case(&[])]
#[case(&[100.0])]
fn test_short_series_is_insufficient(#[case] prices: &[f64]) {
    let series = SeriesFactory::new("SHORT").build(prices);
    assert!(matches!(
        compute_returns_and_volatility(&series, PERIODS),
        Err(MetricsError::InsufficientData { required: 2, actual, .. }) if actual == prices.len()
    ));
}

#[test]
fn test_two_prices_report_undefined_volatility() {
    let series = SeriesFactory::new("TWO").build(&[100.0, 110.0]);
    let err = compute_returns_and_volatility(&series, PERIODS).unwrap_err();
    assert_eq!(
        err,
        MetricsError::UndefinedVolatility {
            symbol: "TWO".to_string()
        }
    );
    assert_error_contains(&err, "single return");
}

#[rstest]
#[case(0.0)]
#[case(-5.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn test_non_positive_or_non_finite_price_is_invalid(#[case] bad: f64) {
    let series = SeriesFactory::new("BAD").build(&[100.0, bad, 101.0]);
    let err = compute_returns_and_volatility(&series, PERIODS).unwrap_err();
    assert!(matches!(err, MetricsError::InvalidPrice { date: d, .. } if d == date(2024, 1, 3)));
    assert!(matches!(
        compute_cumulative_return(&series),
        Err(MetricsError::InvalidPrice { .. })
    ));
}

#[test]
fn test_steady_growth_over_a_year() {
    let series = SeriesFactory::new("STEADY").build_compounding(100.0, 0.01, 253);
    let (annualized_return, annualized_volatility) =
        compute_returns_and_volatility(&series, PERIODS).unwrap();

    assert_approx_eq(annualized_return, 1.01_f64.powi(252) - 1.0, 1e-9);
    assert_approx_eq(annualized_volatility, 0.0, 1e-9);
}

#[test]
fn test_invalid_price_message_names_symbol() {
    let series = SeriesFactory::new("BAD").build(&[100.0, -1.0, 101.0]);
    let err = compute_returns_and_volatility(&series, PERIODS).unwrap_err();
    assert_error_contains(&err, "BAD");
}

#[test]
fn test_single_observation() {
    let series = SeriesFactory::new("ONE").build(&[42.0]);
    assert!(matches!(
        compute_returns_and_volatility(&series, PERIODS),
        Err(MetricsError::InsufficientData { .. })
    ));

    let cumulative = compute_cumulative_return(&series).unwrap();
    assert_eq!(cumulative.values().collect::<Vec<_>>(), vec![0.0]);
}

#[test]
fn test_cumulative_of_empty_series() {
    let series = PriceSeries::empty(Symbol::new("NONE"));
    assert_eq!(
        compute_cumulative_return(&series),
        Err(MetricsError::EmptySeries {
            symbol: "NONE".to_string()
        })
    );
}

#[test]
fn test_zero_first_price_is_invalid() {
    let series = PriceSeries::new(
        Symbol::new("ZERO"),
        vec![PricePoint::new(date(2024, 1, 2), 0.0), PricePoint::new(date(2024, 1, 3), 1.0)],
    )
    .unwrap();
    assert!(matches!(
        compute_cumulative_return(&series),
        Err(MetricsError::InvalidPrice { price, .. }) if price == 0.0
    ));
}

#[rstest]
fn test_cumulative_keeps_dates(compounding_series: PriceSeries) {
    let cumulative = compute_cumulative_return(&compounding_series).unwrap();
    let dates: Vec<_> = cumulative.points().iter().map(|p| p.date).collect();
    assert_eq!(dates, compounding_series.dates().collect::<Vec<_>>());
    assert_relative_eq!(cumulative.points()[2].value, 0.21, max_relative = 1e-12);
}

#[test]
fn test_recomputation_is_bit_identical() {
    let series = SeriesFactory::new("RAND").build(&[101.3, 99.7, 104.2, 103.9, 107.5, 106.1]);

    let first = compute_returns_and_volatility(&series, PERIODS).unwrap();
    let second = compute_returns_and_volatility(&series, PERIODS).unwrap();
    assert_bit_identical(&[first.0, first.1], &[second.0, second.1]);

    let a: Vec<f64> = compute_cumulative_return(&series).unwrap().values().collect();
    let b: Vec<f64> = compute_cumulative_return(&series).unwrap().values().collect();
    assert_bit_identical(&a, &b);
}

fn price_path() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..10_000.0, 1..60)
}

proptest! {
    #[test]
    fn test_cumulative_first_value_is_exactly_zero(prices in price_path()) {
        let series = SeriesFactory::new("PROP").build(&prices);
        let cumulative = compute_cumulative_return(&series).unwrap();
        prop_assert_eq!(cumulative.len(), prices.len());
        prop_assert_eq!(cumulative.points()[0].value.to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn test_cumulative_invariant_under_scaling(prices in price_path(), factor in 0.01f64..1000.0) {
        let base = SeriesFactory::new("PROP").build(&prices);
        let scaled_prices: Vec<f64> = prices.iter().map(|p| p * factor).collect();
        let scaled = SeriesFactory::new("PROP").build(&scaled_prices);

        let a = compute_cumulative_return(&base).unwrap();
        let b = compute_cumulative_return(&scaled).unwrap();
        for (x, y) in a.values().zip(b.values()) {
            prop_assert!((x - y).abs() <= 1e-9 * (1.0 + x.abs()), "{} vs {}", x, y);
        }
    }

    #[test]
    fn test_volatility_is_non_negative(prices in prop::collection::vec(1.0f64..10_000.0, 3..60)) {
        let series = SeriesFactory::new("PROP").build(&prices);
        let (_, volatility) = compute_returns_and_volatility(&series, PERIODS).unwrap();
        prop_assert!(volatility >= 0.0);
    }
}
