//! Online market data sources

pub mod yahoo;
