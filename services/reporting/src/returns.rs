//! Return and risk metrics over adjusted-close series
//!
//! All functions are pure: the same series always produces bit-identical
//! output. Failures are reported as [`MetricsError`] and never replaced by
//! zero or NaN.

use chrono::NaiveDate;
use common::{PriceSeries, Symbol};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use thiserror::Error;

/// Fewest prices that form a return
pub const MIN_OBSERVATIONS: usize = 2;

/// Metric calculation failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// Too few observations for the requested statistic
    #[error("{symbol}: need at least {required} prices, got {actual}")]
    InsufficientData {
        /// Series symbol
        symbol: String,
        /// Minimum observation count
        required: usize,
        /// Observations supplied
        actual: usize,
    },

    /// Exactly two prices: one return has no sample standard deviation
    #[error("{symbol}: a single return has no sample volatility")]
    UndefinedVolatility {
        /// Series symbol
        symbol: String,
    },

    /// Price that is zero, negative or not finite
    #[error("{symbol}: invalid price {price} on {date}")]
    InvalidPrice {
        /// Series symbol
        symbol: String,
        /// Date of the offending observation
        date: NaiveDate,
        /// Offending value
        price: f64,
    },

    /// Series without any observation
    #[error("{symbol}: no price data")]
    EmptySeries {
        /// Series symbol
        symbol: String,
    },

    /// Sharpe ratio over zero volatility
    #[error("annualized volatility is zero; Sharpe ratio is undefined")]
    DivisionByZero,

    /// Calculation setting out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// One point of a cumulative-change line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Trading date
    pub date: NaiveDate,
    /// Change since the first observation, as a fraction
    pub value: f64,
}

/// Cumulative change of one symbol, rebased so the first value is 0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeReturnSeries {
    symbol: Symbol,
    points: Vec<CumulativePoint>,
}

impl CumulativeReturnSeries {
    /// Source symbol
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Points in date order
    #[must_use]
    pub fn points(&self) -> &[CumulativePoint] {
        &self.points
    }

    /// Values in date order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Simple period returns `p[i] / p[i-1] - 1`
#[must_use]
pub fn simple_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Annualized return and annualized volatility of one series
///
/// - return: `prod(1 + r)^(periods / n) - 1`
/// - volatility: sample standard deviation of `r` times `sqrt(periods)`
///
/// A constant series yields `(0.0, 0.0)`.
///
/// # Errors
/// - `InvalidParameter` when `trading_periods_per_year` is zero
/// - `InvalidPrice` for any price that is not finite and positive
/// - `InsufficientData` for fewer than [`MIN_OBSERVATIONS`] prices
/// - `UndefinedVolatility` for exactly two prices
pub fn compute_returns_and_volatility(
    series: &PriceSeries,
    trading_periods_per_year: u32,
) -> Result<(f64, f64), MetricsError> {
    if trading_periods_per_year == 0 {
        return Err(MetricsError::InvalidParameter(
            "trading_periods_per_year must be positive".to_string(),
        ));
    }
    validate_prices(series)?;
    if series.len() < MIN_OBSERVATIONS {
        return Err(MetricsError::InsufficientData {
            symbol: series.symbol().to_string(),
            required: MIN_OBSERVATIONS,
            actual: series.len(),
        });
    }
    if series.len() == MIN_OBSERVATIONS {
        return Err(MetricsError::UndefinedVolatility {
            symbol: series.symbol().to_string(),
        });
    }

    let prices: Vec<f64> = series.prices().collect();
    let returns = simple_returns(&prices);
    let periods = f64::from(trading_periods_per_year);

    let growth: f64 = returns.iter().map(|r| 1.0 + r).product();
    let annualized_return = growth.powf(periods / returns.len() as f64) - 1.0;
    let annualized_volatility = (&returns[..]).std_dev() * periods.sqrt();

    Ok((annualized_return, annualized_volatility))
}

/// `(annualized_return - risk_free_rate) / annualized_volatility`
///
/// # Errors
/// `DivisionByZero` when the volatility is zero
pub fn compute_sharpe_ratio(
    annualized_return: f64,
    annualized_volatility: f64,
    risk_free_rate: f64,
) -> Result<f64, MetricsError> {
    if annualized_volatility.abs() < f64::EPSILON {
        return Err(MetricsError::DivisionByZero);
    }
    Ok((annualized_return - risk_free_rate) / annualized_volatility)
}

/// `price[i] / price[0] - 1` on the series' own dates
///
/// # Errors
/// - `EmptySeries` when there is no observation
/// - `InvalidPrice` for any price that is not finite and positive
pub fn compute_cumulative_return(
    series: &PriceSeries,
) -> Result<CumulativeReturnSeries, MetricsError> {
    let Some(first) = series.first() else {
        return Err(MetricsError::EmptySeries {
            symbol: series.symbol().to_string(),
        });
    };
    validate_prices(series)?;

    let base = first.price;
    let points = series
        .points()
        .iter()
        .map(|p| CumulativePoint {
            date: p.date,
            value: p.price / base - 1.0,
        })
        .collect();

    Ok(CumulativeReturnSeries {
        symbol: series.symbol().clone(),
        points,
    })
}

fn validate_prices(series: &PriceSeries) -> Result<(), MetricsError> {
    match series
        .points()
        .iter()
        .find(|p| !(p.price.is_finite() && p.price > 0.0))
    {
        Some(bad) => Err(MetricsError::InvalidPrice {
            symbol: series.symbol().to_string(),
            date: bad.date,
            price: bad.price,
        }),
        None => Ok(()),
    }
}
