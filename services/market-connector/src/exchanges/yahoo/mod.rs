//! Yahoo Finance connector
//!
//! Daily adjusted closes come from the chart endpoint and company attributes
//! from the quote summary endpoint. Symbols are requested one at a time.

pub mod models;

use self::models::{ChartResponse, ChartResult, QuoteSummary, QuoteSummaryResponse, raw};
use crate::{GatewayError, MarketDataGateway};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use common::{AttributeRecord, LookbackPeriod, PricePoint, PriceSeries, PriceTable, Symbol};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use services_common::GatewayConfig;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const CHART_PATH: &str = "/v8/finance/chart";
const QUOTE_SUMMARY_PATH: &str = "/v10/finance/quoteSummary";
const QUOTE_SUMMARY_MODULES: &str = "price,assetProfile,summaryDetail,defaultKeyStatistics";
const DAILY_INTERVAL: &str = "1d";
const NOT_FOUND_CODE: &str = "Not Found";

/// HTTP connector for the Yahoo Finance API
#[derive(Debug, Clone)]
pub struct YahooConnector {
    client: Client,
    base_url: String,
}

impl YahooConnector {
    /// Build a connector from gateway settings
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API host requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Daily adjusted closes for one symbol; an unknown symbol yields an empty series
    pub async fn fetch_series(
        &self,
        symbol: &Symbol,
        lookback: LookbackPeriod,
    ) -> Result<PriceSeries, GatewayError> {
        let url = format!("{}{CHART_PATH}/{symbol}", self.base_url);
        let query = [("range", lookback.as_str()), ("interval", DAILY_INTERVAL)];

        let Some(response) = self.get_json::<ChartResponse>(symbol, &url, &query).await? else {
            warn!(%symbol, "Chart endpoint does not know symbol; reporting an empty series");
            return Ok(PriceSeries::empty(symbol.clone()));
        };

        if let Some(error) = response.chart.error {
            if error.code == NOT_FOUND_CODE {
                warn!(%symbol, "Chart endpoint does not know symbol; reporting an empty series");
                return Ok(PriceSeries::empty(symbol.clone()));
            }
            return Err(GatewayError::Decode {
                symbol: symbol.to_string(),
                message: error.to_string(),
            });
        }

        match response.chart.result.and_then(|r| r.into_iter().next()) {
            Some(result) => series_from_chart(symbol, result),
            None => {
                warn!(%symbol, "Chart response carries no result; reporting an empty series");
                Ok(PriceSeries::empty(symbol.clone()))
            }
        }
    }

    /// GET `url` and decode a JSON body; `None` on HTTP 404
    async fn get_json<T: DeserializeOwned>(
        &self,
        symbol: &Symbol,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, GatewayError> {
        debug!(%symbol, url, "Requesting market data");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| GatewayError::Http {
                symbol: symbol.to_string(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GatewayError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| GatewayError::Http {
            symbol: symbol.to_string(),
            source,
        })?;

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| GatewayError::Decode {
                symbol: symbol.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl MarketDataGateway for YahooConnector {
    async fn fetch_adjusted_close(
        &self,
        symbols: &[Symbol],
        lookback: LookbackPeriod,
    ) -> Result<PriceTable, GatewayError> {
        let mut series = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            series.push(self.fetch_series(symbol, lookback).await?);
        }

        let table = PriceTable::from_series(series);
        info!(
            symbols = symbols.len(),
            %lookback,
            dates = table.len(),
            "Downloaded adjusted closes"
        );
        Ok(table)
    }

    async fn fetch_attributes(&self, symbol: &Symbol) -> Result<AttributeRecord, GatewayError> {
        let url = format!("{}{QUOTE_SUMMARY_PATH}/{symbol}", self.base_url);
        let query = [("modules", QUOTE_SUMMARY_MODULES)];

        let response = self
            .get_json::<QuoteSummaryResponse>(symbol, &url, &query)
            .await?
            .ok_or_else(|| GatewayError::UnknownSymbol(symbol.to_string()))?;

        if let Some(error) = response.quote_summary.error {
            if error.code == NOT_FOUND_CODE {
                return Err(GatewayError::UnknownSymbol(symbol.to_string()));
            }
            return Err(GatewayError::Decode {
                symbol: symbol.to_string(),
                message: error.to_string(),
            });
        }

        let summary = response
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| GatewayError::UnknownSymbol(symbol.to_string()))?;

        attributes_from_summary(symbol, summary)
    }
}

/// Build a series from one chart result
///
/// Adjusted closes are preferred over raw closes. Timestamps are shifted by
/// the exchange offset before taking the calendar date, so a bar that opens
/// at 09:30 New York time lands on its New York trading day. Null closes are
/// gaps; when two bars share a date the later one wins.
fn series_from_chart(symbol: &Symbol, result: ChartResult) -> Result<PriceSeries, GatewayError> {
    let ChartResult {
        meta,
        timestamp,
        indicators,
    } = result;

    let closes = indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .filter(|c| !c.is_empty())
        .or_else(|| indicators.quote.into_iter().next().map(|q| q.close))
        .unwrap_or_default();

    if closes.len() != timestamp.len() {
        warn!(
            %symbol,
            timestamps = timestamp.len(),
            closes = closes.len(),
            "Chart arrays differ in length; extra entries ignored"
        );
    }

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (ts, close) in timestamp.into_iter().zip(closes) {
        let Some(price) = close.filter(|p| p.is_finite()) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts + meta.gmtoffset, 0)
            .ok_or_else(|| GatewayError::Decode {
                symbol: symbol.to_string(),
                message: format!("timestamp {ts} out of range"),
            })?
            .date_naive();
        by_date.insert(date, price);
    }

    let points = by_date
        .into_iter()
        .map(|(date, price)| PricePoint::new(date, price))
        .collect();
    Ok(PriceSeries::new(symbol.clone(), points)?)
}

fn attributes_from_summary(
    symbol: &Symbol,
    summary: QuoteSummary,
) -> Result<AttributeRecord, GatewayError> {
    let price = summary.price.unwrap_or_default();
    let detail = summary.summary_detail.unwrap_or_default();

    let market_cap = raw(price.market_cap)
        .or_else(|| raw(detail.market_cap))
        .ok_or_else(|| GatewayError::MissingField {
            symbol: symbol.to_string(),
            field: "marketCap",
        })?;

    let sector = summary
        .asset_profile
        .and_then(|p| p.sector)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| GatewayError::MissingField {
            symbol: symbol.to_string(),
            field: "sector",
        })?;

    let name = price
        .short_name
        .or(price.long_name)
        .unwrap_or_else(|| symbol.to_string());

    Ok(AttributeRecord {
        symbol: symbol.clone(),
        name,
        sector,
        market_cap,
        price_to_book: raw(summary.default_key_statistics.and_then(|k| k.price_to_book)),
        dividend_yield: raw(detail.dividend_yield),
    })
}
