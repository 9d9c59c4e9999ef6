use chrono::{DateTime, FixedOffset, NaiveDateTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Timestamp as delivered by a data provider.
///
/// Providers may hand back either naive wall-clock stamps or offset-aware
/// ones. The normalizer decides how to interpret each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTimestamp {
    Naive(NaiveDateTime),
    Aware(DateTime<FixedOffset>),
}

impl RawTimestamp {
    pub fn is_naive(&self) -> bool {
        matches!(self, RawTimestamp::Naive(_))
    }
}

/// One OHLCV sample before timezone normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub timestamp: RawTimestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Provider response for one symbol.
#[derive(Debug, Clone, Default)]
pub struct RawSeries {
    pub symbol: String,
    pub bars: Vec<RawBar>,
}

impl RawSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<RawBar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Timezone-aware OHLCV bar in the display timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Tz>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Normalized bar series for one instrument.
///
/// Timestamps are strictly increasing and share one timezone. Only the
/// normalizer constructs this type.
#[derive(Debug, Clone)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    pub(crate) fn from_normalized(symbol: String, bars: Vec<Bar>) -> Self {
        Self { symbol, bars }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

/// Bar plus the overlay columns a chart needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Unix timestamp (milliseconds).
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Long-period EMA. `None` during warm-up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_trend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_lower: Option<f64>,
}

/// Last bar OHLC for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LastBar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl From<&Bar> for LastBar {
    fn from(bar: &Bar) -> Self {
        Self {
            time: bar.timestamp.timestamp_millis(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}
