//! Test fixtures for common test data

use crate::factories::{AttributeFactory, SeriesFactory, table_from};
use common::{AttributeRecord, PriceSeries, PriceTable};
use rstest::fixture;

/// Five stocks across three sectors, listed out of market-cap order
///
/// AMZN and ABNB report no dividend yield; ABNB reports no price-to-book.
#[fixture]
pub fn sample_universe() -> Vec<AttributeRecord> {
    vec![
        AttributeFactory::new("XOM")
            .name("Exxon Mobil Corporation")
            .sector("Energy")
            .market_cap_billions(460.0)
            .price_to_book(2.2)
            .dividend_yield(0.034)
            .build(),
        AttributeFactory::new("AAPL")
            .name("Apple Inc.")
            .market_cap_billions(3000.0)
            .price_to_book(45.0)
            .dividend_yield(0.005)
            .build(),
        AttributeFactory::new("ABNB")
            .name("Airbnb, Inc.")
            .sector("Consumer Cyclical")
            .market_cap_billions(90.0)
            .build(),
        AttributeFactory::new("MSFT")
            .name("Microsoft Corporation")
            .market_cap_billions(2900.0)
            .price_to_book(12.0)
            .dividend_yield(0.0072)
            .build(),
        AttributeFactory::new("AMZN")
            .name("Amazon.com, Inc.")
            .sector("Consumer Cyclical")
            .market_cap_billions(1900.0)
            .price_to_book(8.1)
            .build(),
    ]
}

/// `[100, 110, 121]`: two identical 10% returns
#[fixture]
pub fn compounding_series() -> PriceSeries {
    SeriesFactory::new("GROW").build(&[100.0, 110.0, 121.0])
}

/// Five identical prices
#[fixture]
pub fn constant_series() -> PriceSeries {
    SeriesFactory::new("FLAT").build(&[50.0; 5])
}

/// Two equities and both default indices over six weekdays
///
/// MSFT is missing its third observation.
#[fixture]
pub fn sample_price_table() -> PriceTable {
    let mut msft = SeriesFactory::new("MSFT")
        .build(&[400.0, 404.0, 0.0, 398.0, 410.0, 415.0])
        .points()
        .to_vec();
    msft.remove(2);

    table_from([
        SeriesFactory::new("AAPL").build(&[185.0, 184.0, 181.5, 181.2, 185.6, 186.2]),
        PriceSeries::new(common::Symbol::new("MSFT"), msft).expect("ordered points"),
        SeriesFactory::new("^GSPC").build(&[4742.8, 4704.8, 4688.7, 4697.2, 4763.5, 4756.5]),
        SeriesFactory::new("^IXIC").build(&[14765.9, 14592.2, 14641.2, 14524.1, 14843.8, 14857.7]),
    ])
}
