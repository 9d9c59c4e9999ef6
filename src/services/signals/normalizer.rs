//! Series validation and timezone normalization.

use chrono::{TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::EngineError;
use crate::types::{Bar, RawSeries, RawTimestamp, Series};

/// Turns a provider response into a [`Series`] in the display timezone.
///
/// Naive timestamps are read as UTC. A series may be all naive or all aware;
/// a mix is rejected rather than coerced. Gaps are left alone.
#[derive(Debug, Clone)]
pub struct SeriesNormalizer {
    display_tz: Tz,
    min_bars: usize,
}

impl SeriesNormalizer {
    pub fn new(display_tz: Tz, min_bars: usize) -> Self {
        Self {
            display_tz,
            min_bars,
        }
    }

    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }

    pub fn min_bars(&self) -> usize {
        self.min_bars
    }

    pub fn normalize(&self, raw: RawSeries) -> Result<Series, EngineError> {
        if raw.is_empty() || raw.len() < self.min_bars {
            return Err(EngineError::InsufficientData {
                bars: raw.len(),
                required: self.min_bars,
            });
        }

        let naive = raw.bars[0].timestamp.is_naive();
        if raw.bars.iter().any(|b| b.timestamp.is_naive() != naive) {
            return Err(EngineError::TimezoneMismatch);
        }

        let mut bars: Vec<Bar> = Vec::with_capacity(raw.len());
        for (index, raw_bar) in raw.bars.into_iter().enumerate() {
            let timestamp = match raw_bar.timestamp {
                RawTimestamp::Naive(ts) => Utc.from_utc_datetime(&ts).with_timezone(&self.display_tz),
                RawTimestamp::Aware(ts) => ts.with_timezone(&self.display_tz),
            };

            if let Some(prev) = bars.last() {
                if timestamp <= prev.timestamp {
                    return Err(EngineError::UnorderedSeries { index });
                }
            }

            bars.push(Bar {
                timestamp,
                open: raw_bar.open,
                high: raw_bar.high,
                low: raw_bar.low,
                close: raw_bar.close,
                volume: raw_bar.volume,
            });
        }

        Ok(Series::from_normalized(raw.symbol, bars))
    }
}
