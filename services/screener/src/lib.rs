//! Stock screener dashboard
//!
//! Filters a ticker universe by market cap, price-to-book, dividend yield
//! and sector, then compares return and risk metrics for a selection of
//! filtered stocks and market indices.

pub mod filter;
pub mod render;
pub mod session;
pub mod universe;

pub use filter::{FilterCriteria, available_sectors, filter_universe};
pub use session::{Comparison, Dashboard, Screening};
pub use universe::Universe;

use services_common::{GatewayKind, ScreenerConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default tracing directives for the `screener` binary
pub const DEFAULT_LOG_DIRECTIVES: &str = "screener=info,market_connector=info,reporting=info";

/// Dashboard errors
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// Market data could not be fetched
    #[error(transparent)]
    Gateway(#[from] market_connector::GatewayError),

    /// A metric failed under the halt policy
    #[error("metrics computation halted: {0}")]
    Metrics(#[from] reporting::MetricsError),

    /// Chart could not be exported
    #[error(transparent)]
    Chart(#[from] reporting::ChartError),

    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Service(#[from] services_common::ServiceError),
}

/// Configuration for one run
///
/// `offline` switches the gateway to the CSV files in that directory before
/// validation, so a file selecting `csv` without a `data_dir` is accepted
/// when the directory is given here.
///
/// # Errors
/// `Service` when the file cannot be read or the merged settings are invalid
pub fn load_config(
    path: Option<&Path>,
    offline: Option<PathBuf>,
) -> Result<ScreenerConfig, ScreenerError> {
    let mut config = ScreenerConfig::read(path)?;
    if let Some(dir) = offline {
        config.gateway.kind = GatewayKind::Csv;
        config.gateway.data_dir = Some(dir);
    }
    config.validate()?;
    Ok(config)
}
