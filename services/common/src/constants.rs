//! Common constants used across all services
//!
//! Single source of truth for defaults that configuration may override

// Analytics
/// Annual risk-free rate (10 year US treasury, May 2024)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.045;
/// Conventional trading-day count per year
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

// Unit conversions
/// Currency units per billion
pub const BILLION: f64 = 1e9;
/// Percentage points per unit fraction
pub const PERCENT: f64 = 100.0;

// Universe
/// First 25 S&P 500 constituents in index-list order
pub const DEFAULT_EQUITY_TICKERS: [&str; 25] = [
    "MMM", "AOS", "ABT", "ABBV", "ACN", "ADBE", "AMD", "AES", "AFL", "A", "APD", "ABNB", "AKAM",
    "ALB", "ARE", "ALGN", "ALLE", "LNT", "ALL", "GOOGL", "GOOG", "MO", "AMZN", "AMCR", "AEE",
];
/// Broad-market indices as (display label, symbol)
pub const DEFAULT_INDEX_ALIASES: [(&str, &str); 2] = [
    ("S&P 500 Index", "^GSPC"),
    ("Nasdaq Composite Index", "^IXIC"),
];
/// Sector selection that expands to every sector present
pub const ALL_SECTORS: &str = "All";

// Filter slider bounds
/// Market cap slider bounds in billions
pub const MARKET_CAP_BILLIONS_BOUNDS: (f64, f64) = (0.0, 3000.0);
/// Price-to-book slider bounds
pub const PRICE_TO_BOOK_BOUNDS: (f64, f64) = (0.0, 100.0);
/// Dividend yield slider bounds in percent
pub const DIVIDEND_YIELD_PCT_BOUNDS: (f64, f64) = (0.0, 10.0);

// Gateway
/// Yahoo Finance API host
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";
/// User agent sent with market data requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; stock-screener/0.1)";
/// HTTP request timeout
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "SCREENER";
