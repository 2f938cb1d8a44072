//! Common market data types for the stock screener
//!
//! Shared by the market connector, the reporting calculator and the
//! screener dashboard.

pub mod series;
pub mod types;

pub use series::*;
pub use types::*;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while constructing market data types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// Observation dates are not strictly increasing
    #[error("{symbol}: dates must be strictly increasing ({previous} followed by {next})")]
    UnorderedDates {
        /// Series or table owner
        symbol: String,
        /// Earlier observation date
        previous: NaiveDate,
        /// Offending observation date
        next: NaiveDate,
    },

    /// A table column does not match the shared date axis
    #[error("{symbol}: column has {actual} values but the date axis has {expected}")]
    ColumnLength {
        /// Column symbol
        symbol: String,
        /// Length of the date axis
        expected: usize,
        /// Length of the column
        actual: usize,
    },

    /// Unrecognised lookback period
    #[error("invalid lookback period: {0}")]
    InvalidLookback(String),
}
