//! Price series and date-aligned price tables

use crate::{DataError, Symbol};
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One adjusted-close observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Adjusted closing price
    pub price: f64,
}

impl PricePoint {
    /// Create a new observation
    #[must_use]
    pub const fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// Ordered adjusted-close history for one symbol
///
/// Dates are strictly increasing. Prices are stored as delivered; positivity
/// is checked by the calculations that depend on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesFields")]
pub struct PriceSeries {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

#[derive(Deserialize)]
struct SeriesFields {
    symbol: Symbol,
    points: Vec<PricePoint>,
}

impl TryFrom<SeriesFields> for PriceSeries {
    type Error = DataError;

    fn try_from(fields: SeriesFields) -> Result<Self, Self::Error> {
        Self::new(fields.symbol, fields.points)
    }
}

impl PriceSeries {
    /// Build a series, rejecting dates that are not strictly increasing
    pub fn new(symbol: Symbol, points: Vec<PricePoint>) -> Result<Self, DataError> {
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(DataError::UnorderedDates {
                symbol: symbol.to_string(),
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
        Ok(Self { symbol, points })
    }

    /// Series with no observations
    #[must_use]
    pub const fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            points: Vec::new(),
        }
    }

    /// Owning symbol
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Observations in date order
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Prices in date order
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    /// Dates in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// Number of observations
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First observation
    #[must_use]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Last observation
    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Adjusted closes for several symbols on one shared trading-date axis
///
/// Missing observations are gaps (`None`), never zeros.
///
/// Deserialization applies the same date-axis and column-length checks as
/// [`PriceTable::new`] and [`PriceTable::insert_column`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableFields")]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: FxHashMap<Symbol, Vec<Option<f64>>>,
}

#[derive(Deserialize)]
struct TableFields {
    dates: Vec<NaiveDate>,
    columns: FxHashMap<Symbol, Vec<Option<f64>>>,
}

impl TryFrom<TableFields> for PriceTable {
    type Error = DataError;

    fn try_from(fields: TableFields) -> Result<Self, Self::Error> {
        let mut table = Self::new(fields.dates)?;
        for (symbol, column) in fields.columns {
            table.insert_column(symbol, column)?;
        }
        Ok(table)
    }
}

impl PriceTable {
    /// Create a table over a strictly increasing date axis
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self, DataError> {
        if let Some(pair) = dates.windows(2).find(|w| w[1] <= w[0]) {
            return Err(DataError::UnorderedDates {
                symbol: "price table".to_string(),
                previous: pair[0],
                next: pair[1],
            });
        }
        Ok(Self {
            dates,
            columns: FxHashMap::default(),
        })
    }

    /// Align several series on the union of their dates
    pub fn from_series(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        let series: Vec<PriceSeries> = series.into_iter().collect();
        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(PriceSeries::dates)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let index: FxHashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut columns = FxHashMap::default();
        for s in series {
            let mut column = vec![None; dates.len()];
            for point in s.points() {
                if let Some(&i) = index.get(&point.date) {
                    column[i] = Some(point.price);
                }
            }
            columns.insert(s.symbol, column);
        }

        Self { dates, columns }
    }

    /// Add or replace a column; its length must match the date axis
    pub fn insert_column(
        &mut self,
        symbol: Symbol,
        values: Vec<Option<f64>>,
    ) -> Result<(), DataError> {
        if values.len() != self.dates.len() {
            return Err(DataError::ColumnLength {
                symbol: symbol.to_string(),
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(symbol, values);
        Ok(())
    }

    /// Shared date axis
    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Raw column including gaps
    #[must_use]
    pub fn column(&self, symbol: &Symbol) -> Option<&[Option<f64>]> {
        self.columns.get(symbol).map(Vec::as_slice)
    }

    /// Whether the table carries a column for `symbol`
    #[must_use]
    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.columns.contains_key(symbol)
    }

    /// Column symbols in sorted order
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.columns.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Number of trading dates
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the table has no dates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Series for `symbol` with gaps dropped; unknown symbols yield an empty series
    #[must_use]
    pub fn series(&self, symbol: &Symbol) -> PriceSeries {
        let Some(column) = self.columns.get(symbol) else {
            return PriceSeries::empty(symbol.clone());
        };

        let points = self
            .dates
            .iter()
            .zip(column)
            .filter_map(|(date, price)| price.map(|p| PricePoint::new(*date, p)))
            .collect();

        // The axis is strictly increasing, so the filtered points are too
        PriceSeries {
            symbol: symbol.clone(),
            points,
        }
    }

    /// Rows dated on or after `start`
    #[must_use]
    pub fn since(&self, start: NaiveDate) -> Self {
        let offset = self.dates.partition_point(|d| *d < start);
        Self {
            dates: self.dates[offset..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(symbol, column)| (symbol.clone(), column[offset..].to_vec()))
                .collect(),
        }
    }

    /// Table restricted to the requested symbols; missing symbols get an all-gap column
    #[must_use]
    pub fn select(&self, symbols: &[Symbol]) -> Self {
        let columns = symbols
            .iter()
            .map(|symbol| {
                let column = self
                    .columns
                    .get(symbol)
                    .cloned()
                    .unwrap_or_else(|| vec![None; self.dates.len()]);
                (symbol.clone(), column)
            })
            .collect();
        Self {
            dates: self.dates.clone(),
            columns,
        }
    }
}
