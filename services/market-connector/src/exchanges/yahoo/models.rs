//! Yahoo Finance response bodies
//!
//! Only the fields the connector reads are modelled; everything else in the
//! payload is ignored. Yahoo encodes a missing numeric as `{}` or omits the
//! key entirely, so every value is optional.

use serde::Deserialize;

/// `/v8/finance/chart/{symbol}` envelope
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: ChartMeta,
    /// Bar open times, seconds since the epoch (UTC)
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
    #[serde(default)]
    pub adjclose: Vec<AdjCloseIndicator>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdjCloseIndicator {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Error object returned in place of a result
#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.code, description),
            None => f.write_str(&self.code),
        }
    }
}

/// `/v10/finance/quoteSummary/{symbol}` envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryBody {
    #[serde(default)]
    pub result: Option<Vec<QuoteSummary>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    #[serde(default)]
    pub price: Option<PriceModule>,
    #[serde(default)]
    pub asset_profile: Option<AssetProfile>,
    #[serde(default)]
    pub summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    pub default_key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetProfile {
    #[serde(default)]
    pub sector: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    #[serde(default)]
    pub market_cap: Option<RawValue>,
    #[serde(default)]
    pub dividend_yield: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatistics {
    #[serde(default)]
    pub price_to_book: Option<RawValue>,
}

/// Numeric value with Yahoo's display formatting alongside
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct RawValue {
    #[serde(default)]
    pub raw: Option<f64>,
}

/// Unwrap an optional `{ "raw": .. }` value
pub fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}
