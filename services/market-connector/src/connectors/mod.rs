//! Offline connectors backed by local files

mod file;

pub use file::{ATTRIBUTES_FILE, CsvConnector, PRICES_FILE};
