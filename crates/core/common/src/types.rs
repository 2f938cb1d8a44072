//! Core types for the stock screener

use crate::DataError;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticker symbol as quoted by the market data source (e.g. `AAPL`, `^GSPC`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol, trimming surrounding whitespace
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_string())
    }

    /// Symbol code
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this symbol quotes an index rather than a tradable equity
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.0.starts_with('^')
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Symbol {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Static per-symbol facts used by the universe filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Ticker symbol
    pub symbol: Symbol,
    /// Display name
    pub name: String,
    /// Sector classification
    pub sector: String,
    /// Market capitalization in currency units
    pub market_cap: f64,
    /// Price-to-book ratio, absent for companies without book value data
    pub price_to_book: Option<f64>,
    /// Dividend yield as a fraction (0.015 = 1.5%)
    pub dividend_yield: Option<f64>,
}

impl AttributeRecord {
    /// Market capitalization in billions
    #[must_use]
    pub fn market_cap_billions(&self) -> f64 {
        self.market_cap / 1e9
    }
}

/// Inclusive numeric range as entered on a filter slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound, inclusive
    pub min: f64,
    /// Upper bound, inclusive
    pub max: f64,
}

impl ValueRange {
    /// Create a new range
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max` with both bounds comparable
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.min <= self.max
    }

    /// Inclusive membership test
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Historical window requested from the market data source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LookbackPeriod {
    /// One trading day
    OneDay,
    /// Five days
    FiveDays,
    /// One month
    OneMonth,
    /// Three months
    ThreeMonths,
    /// Six months
    SixMonths,
    /// One year
    #[default]
    OneYear,
    /// Two years
    TwoYears,
    /// Five years
    FiveYears,
    /// Ten years
    TenYears,
    /// Since the first of January of the latest year
    YearToDate,
    /// Everything available
    Max,
}

impl LookbackPeriod {
    /// Range code understood by the market data source
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// First date covered by the window ending at `end`, `None` when unbounded
    #[must_use]
    pub fn start_from(&self, end: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::OneDay => Some(end),
            Self::FiveDays => end.checked_sub_days(Days::new(5)),
            Self::OneMonth => end.checked_sub_months(Months::new(1)),
            Self::ThreeMonths => end.checked_sub_months(Months::new(3)),
            Self::SixMonths => end.checked_sub_months(Months::new(6)),
            Self::OneYear => end.checked_sub_months(Months::new(12)),
            Self::TwoYears => end.checked_sub_months(Months::new(24)),
            Self::FiveYears => end.checked_sub_months(Months::new(60)),
            Self::TenYears => end.checked_sub_months(Months::new(120)),
            Self::YearToDate => NaiveDate::from_ymd_opt(end.year(), 1, 1),
            Self::Max => None,
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookbackPeriod {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::OneDay),
            "5d" => Ok(Self::FiveDays),
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            "10y" => Ok(Self::TenYears),
            "ytd" => Ok(Self::YearToDate),
            "max" => Ok(Self::Max),
            other => Err(DataError::InvalidLookback(other.to_string())),
        }
    }
}

impl TryFrom<String> for LookbackPeriod {
    type Error = DataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookbackPeriod> for String {
    fn from(period: LookbackPeriod) -> Self {
        period.as_str().to_string()
    }
}
