//! Yahoo Finance chart API client for intraday bars.
//!
//! Covers forex pairs, futures, and crypto through one endpoint.
//! Uses the unofficial v8 chart API (no key required).

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{BarRequest, MarketDataProvider};
use crate::error::EngineError;
use crate::types::{RawBar, RawSeries, RawTimestamp};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Smallest Yahoo range string covering `days`.
fn range_for_days(days: i64) -> &'static str {
    match days {
        d if d <= 1 => "1d",
        d if d <= 5 => "5d",
        d if d <= 30 => "1mo",
        _ => "3mo",
    }
}

fn interval_param(minutes: u32) -> String {
    format!("{}m", minutes.max(1))
}

/// Flatten a chart response into raw bars.
///
/// Bars without a positive close are skipped. Missing open/high/low fall
/// back to the close so a null field never reads as a zero price.
fn parse_chart(symbol: &str, data: YahooChartResponse) -> Result<RawSeries, EngineError> {
    if let Some(error) = data.chart.error {
        return Err(EngineError::FetchFailure(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(RawSeries::new(symbol, Vec::new()));
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(RawSeries::new(symbol, Vec::new()));
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let close = closes.get(i).copied().flatten().unwrap_or(0.0);
        if close <= 0.0 {
            continue;
        }

        let Some(time) = Utc.timestamp_opt(ts, 0).single() else {
            warn!(symbol, ts, "Skipping bar with invalid timestamp");
            continue;
        };

        bars.push(RawBar {
            timestamp: RawTimestamp::Aware(time.fixed_offset()),
            open: opens.get(i).copied().flatten().unwrap_or(close),
            high: highs.get(i).copied().flatten().unwrap_or(close),
            low: lows.get(i).copied().flatten().unwrap_or(close),
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0) as f64,
        });
    }

    Ok(RawSeries::new(symbol, bars))
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Self {
        Self::with_base_url(CHART_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, request: &BarRequest) -> String {
        format!(
            "{}/{}?range={}&interval={}&includePrePost=false",
            self.base_url,
            request.symbol,
            range_for_days(request.lookback.num_days()),
            interval_param(request.interval_minutes)
        )
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_bars(&self, request: &BarRequest) -> Result<RawSeries, EngineError> {
        let url = self.chart_url(request);
        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::FetchFailure(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(EngineError::FetchFailure(format!(
                "API error: {}",
                response.status()
            )));
        }

        let data: YahooChartResponse = response
            .json()
            .await
            .map_err(|e| EngineError::FetchFailure(format!("Parse error: {}", e)))?;

        parse_chart(&request.symbol, data)
    }
}
