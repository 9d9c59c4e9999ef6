//! Market data providers.
//!
//! [`MarketDataProvider`] is the seam between the signal service and any
//! vendor that can return OHLCV bars. The service holds it as
//! `Arc<dyn MarketDataProvider>` so tests and alternative vendors plug in
//! without touching the engine.

pub mod yahoo;

use async_trait::async_trait;
use chrono::Duration;

use crate::error::EngineError;
use crate::types::RawSeries;

pub use yahoo::YahooFinanceClient;

/// Bars requested for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarRequest {
    pub symbol: String,
    /// How far back from now.
    pub lookback: Duration,
    /// Bar width in minutes.
    pub interval_minutes: u32,
}

impl BarRequest {
    pub fn new(symbol: impl Into<String>, lookback: Duration, interval_minutes: u32) -> Self {
        Self {
            symbol: symbol.into(),
            lookback,
            interval_minutes,
        }
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short vendor name for logs.
    fn name(&self) -> &'static str;

    /// Fetch bars in provider order. Transport and vendor errors map to
    /// [`EngineError::FetchFailure`]; an empty series is not an error here.
    async fn fetch_bars(&self, request: &BarRequest) -> Result<RawSeries, EngineError>;
}
