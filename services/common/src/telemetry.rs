//! Tracing subscriber setup

use crate::errors::ServiceError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber
///
/// Filter directives come from `RUST_LOG` when set, otherwise from
/// `default_directives`. Output goes to stderr so tables printed on stdout
/// stay machine readable.
pub fn init_tracing(default_directives: &str) -> Result<(), ServiceError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives))
        .map_err(|e| ServiceError::Telemetry(e.to_string()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| ServiceError::Telemetry(e.to_string()))
}
