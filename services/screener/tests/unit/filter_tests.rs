//! Universe filter tests

use common::{AttributeRecord, ValueRange};
use pretty_assertions::assert_eq;
use rstest::*;
use screener::{FilterCriteria, available_sectors, filter_universe};
use test_utils::{assert_sorted_desc, sample_universe};

fn symbols(records: &[AttributeRecord]) -> Vec<String> {
    records.iter().map(|r| r.symbol.to_string()).collect()
}

#[rstest]
fn test_default_criteria_keep_everything_by_market_cap(sample_universe: Vec<AttributeRecord>) {
    let passed = filter_universe(&sample_universe, &FilterCriteria::default());

    assert_eq!(symbols(&passed), vec!["AAPL", "MSFT", "AMZN", "XOM", "ABNB"]);
    let caps: Vec<f64> = passed.iter().map(|r| r.market_cap).collect();
    assert_sorted_desc(&caps);
}

#[rstest]
#[case::high_yield_only(ValueRange::new(5.0, 10.0), vec!["AMZN", "ABNB"])]
#[case::exact_bound(ValueRange::new(0.5, 0.5), vec!["AAPL", "AMZN", "ABNB"])]
#[case::mid_range(ValueRange::new(0.6, 4.0), vec!["MSFT", "AMZN", "XOM", "ABNB"])]
fn test_dividend_range_in_percent_keeps_missing_yields(
    sample_universe: Vec<AttributeRecord>,
    #[case] range: ValueRange,
    #[case] expected: Vec<&str>,
) {
    let criteria = FilterCriteria {
        dividend_yield_pct: range,
        ..FilterCriteria::default()
    };
    assert_eq!(symbols(&filter_universe(&sample_universe, &criteria)), expected);
}

#[rstest]
fn test_price_to_book_range_keeps_missing_ratio(sample_universe: Vec<AttributeRecord>) {
    let criteria = FilterCriteria {
        price_to_book: ValueRange::new(10.0, 50.0),
        ..FilterCriteria::default()
    };
    assert_eq!(
        symbols(&filter_universe(&sample_universe, &criteria)),
        vec!["AAPL", "MSFT", "ABNB"]
    );
}

#[rstest]
#[case::single(vec!["Energy"], vec!["XOM"])]
#[case::several(vec!["Consumer Cyclical", "Energy"], vec!["AMZN", "XOM", "ABNB"])]
#[case::all_marker(vec!["All", "Energy"], vec!["AAPL", "MSFT", "AMZN", "XOM", "ABNB"])]
#[case::unknown(vec!["Utilities"], vec![])]
fn test_sector_selection(
    sample_universe: Vec<AttributeRecord>,
    #[case] sectors: Vec<&str>,
    #[case] expected: Vec<&str>,
) {
    let criteria = FilterCriteria {
        sectors: sectors.into_iter().map(String::from).collect(),
        ..FilterCriteria::default()
    };
    assert_eq!(symbols(&filter_universe(&sample_universe, &criteria)), expected);
}

#[rstest]
fn test_market_cap_range_in_billions(sample_universe: Vec<AttributeRecord>) {
    let criteria = FilterCriteria {
        market_cap_billions: ValueRange::new(100.0, 2000.0),
        ..FilterCriteria::default()
    };
    assert_eq!(
        symbols(&filter_universe(&sample_universe, &criteria)),
        vec!["AMZN", "XOM"]
    );
}

#[rstest]
fn test_inverted_range_matches_nothing(sample_universe: Vec<AttributeRecord>) {
    let criteria = FilterCriteria {
        market_cap_billions: ValueRange::new(2000.0, 100.0),
        ..FilterCriteria::default()
    };
    assert!(!criteria.is_well_formed());
    assert!(filter_universe(&sample_universe, &criteria).is_empty());
}

#[rstest]
fn test_empty_universe() {
    assert!(filter_universe(&[], &FilterCriteria::default()).is_empty());
    assert!(available_sectors(&[]).is_empty());
}

#[rstest]
fn test_sectors_listed_from_whole_universe(sample_universe: Vec<AttributeRecord>) {
    assert_eq!(
        available_sectors(&sample_universe),
        vec!["Consumer Cyclical", "Energy", "Technology"]
    );
}
