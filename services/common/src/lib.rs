//! Configuration, constants, logging setup and error types shared by the
//! screener services

pub mod config;
pub mod constants;
pub mod errors;
pub mod telemetry;

pub use self::config::*;
pub use constants::*;
pub use errors::*;
pub use telemetry::*;
