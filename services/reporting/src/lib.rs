//! Reporting Service
//!
//! Return and risk metrics for selected symbols:
//! - `returns`: annualized return, volatility, Sharpe ratio and cumulative change
//! - `metrics`: per-label report with failure isolation
//! - `chart`: cumulative-change chart model with JSON and CSV export

pub mod chart;
pub mod metrics;
pub mod returns;

pub use chart::{ChartError, ChartLine, CumulativeChart};
pub use metrics::{MetricsEntry, MetricsReport, MetricsRow, MetricsSettings, Selection};
pub use returns::{
    CumulativePoint, CumulativeReturnSeries, MIN_OBSERVATIONS, MetricsError,
    compute_cumulative_return, compute_returns_and_volatility, compute_sharpe_ratio,
    simple_returns,
};
