//! CSV file connector
//!
//! Reads a directory holding two files:
//! - `prices.csv`: a `date` column (`YYYY-MM-DD`) followed by one column of
//!   adjusted closes per symbol; blank cells are gaps
//! - `attributes.csv`: `symbol,name,sector,market_cap,price_to_book,dividend_yield`
//!   with blank cells for missing ratios
//!
//! Both files are loaded eagerly when the connector is opened.

use crate::{GatewayError, MarketDataGateway};
use async_trait::async_trait;
use chrono::NaiveDate;
use common::{AttributeRecord, LookbackPeriod, PriceTable, Symbol};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Price history file name
pub const PRICES_FILE: &str = "prices.csv";
/// Attribute file name
pub const ATTRIBUTES_FILE: &str = "attributes.csv";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row of `attributes.csv`
#[derive(Debug, Deserialize)]
struct AttributeRow {
    symbol: String,
    name: String,
    sector: String,
    market_cap: f64,
    price_to_book: Option<f64>,
    dividend_yield: Option<f64>,
}

impl From<AttributeRow> for AttributeRecord {
    fn from(row: AttributeRow) -> Self {
        Self {
            symbol: Symbol::new(&row.symbol),
            name: row.name,
            sector: row.sector,
            market_cap: row.market_cap,
            price_to_book: row.price_to_book,
            dividend_yield: row.dividend_yield,
        }
    }
}

/// Market data served from CSV files
#[derive(Debug, Clone)]
pub struct CsvConnector {
    prices: PriceTable,
    attributes: FxHashMap<Symbol, AttributeRecord>,
}

impl CsvConnector {
    /// Load `prices.csv` and `attributes.csv` from `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, GatewayError> {
        let dir = dir.as_ref();
        let prices_path = dir.join(PRICES_FILE);
        let attributes_path = dir.join(ATTRIBUTES_FILE);

        let connector = Self::from_readers(
            open_file(&prices_path)?,
            &prices_path,
            open_file(&attributes_path)?,
            &attributes_path,
        )?;

        info!(
            dir = %dir.display(),
            dates = connector.prices.len(),
            symbols = connector.prices.symbols().len(),
            records = connector.attributes.len(),
            "Loaded CSV market data"
        );
        Ok(connector)
    }

    /// Parse price and attribute data from arbitrary readers; the paths only
    /// label errors
    pub fn from_readers(
        prices: impl Read,
        prices_path: &Path,
        attributes: impl Read,
        attributes_path: &Path,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            prices: parse_prices(prices, prices_path)?,
            attributes: parse_attributes(attributes, attributes_path)?,
        })
    }

    /// Full price table as loaded
    #[must_use]
    pub const fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Symbols with an attribute record, sorted
    #[must_use]
    pub fn attribute_symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.attributes.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

#[async_trait]
impl MarketDataGateway for CsvConnector {
    async fn fetch_adjusted_close(
        &self,
        symbols: &[Symbol],
        lookback: LookbackPeriod,
    ) -> Result<PriceTable, GatewayError> {
        for symbol in symbols.iter().filter(|s| !self.prices.contains(s)) {
            warn!(%symbol, "No price column in CSV data; reporting an empty series");
        }

        let window = match self
            .prices
            .dates()
            .last()
            .and_then(|last| lookback.start_from(*last))
        {
            Some(start) => self.prices.since(start),
            None => self.prices.clone(),
        };

        debug!(
            symbols = symbols.len(),
            %lookback,
            dates = window.len(),
            "Served prices from CSV data"
        );
        Ok(window.select(symbols))
    }

    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<AttributeRecord, GatewayError> {
        self.attributes
            .get(symbol)
            .cloned()
            .ok_or_else(|| GatewayError::UnknownSymbol(symbol.to_string()))
    }
}

fn open_file(path: &Path) -> Result<File, GatewayError> {
    File::open(path).map_err(|source| GatewayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_error(path: &Path, source: csv::Error) -> GatewayError {
    GatewayError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn decode_error(path: &Path, message: String) -> GatewayError {
    GatewayError::Decode {
        symbol: path.display().to_string(),
        message,
    }
}

fn parse_prices(reader: impl Read, path: &Path) -> Result<PriceTable, GatewayError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    match headers.get(0) {
        Some(first) if first.eq_ignore_ascii_case("date") => {}
        _ => {
            return Err(decode_error(
                path,
                "first column must be named `date`".to_string(),
            ));
        }
    }
    let symbols: Vec<Symbol> = headers.iter().skip(1).map(Symbol::new).collect();

    let mut dates = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); symbols.len()];

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let raw_date = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
            decode_error(path, format!("row {}: bad date {raw_date:?}: {e}", line + 1))
        })?;
        dates.push(date);

        for (i, column) in columns.iter_mut().enumerate() {
            let cell = record.get(i + 1).unwrap_or_default();
            let value = if cell.is_empty() {
                None
            } else {
                Some(cell.parse::<f64>().map_err(|e| {
                    decode_error(
                        path,
                        format!("row {}, column {}: bad price {cell:?}: {e}", line + 1, symbols[i]),
                    )
                })?)
            };
            column.push(value);
        }
    }

    let mut table = PriceTable::new(dates)?;
    for (symbol, column) in symbols.into_iter().zip(columns) {
        table.insert_column(symbol, column)?;
    }
    Ok(table)
}

fn parse_attributes(
    reader: impl Read,
    path: &Path,
) -> Result<FxHashMap<Symbol, AttributeRecord>, GatewayError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = FxHashMap::default();
    for row in reader.deserialize::<AttributeRow>() {
        let record = AttributeRecord::from(row.map_err(|e| csv_error(path, e))?);
        if records.contains_key(&record.symbol) {
            warn!(symbol = %record.symbol, "Duplicate attribute row; keeping the last one");
        }
        records.insert(record.symbol.clone(), record);
    }
    Ok(records)
}
