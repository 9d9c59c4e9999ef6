//! Average True Range (ATR) indicator.

use super::rolling_mean;
use crate::types::Bar;

/// ATR (Average True Range) indicator.
///
/// Rolling mean of the bar range `high - low`. Gaps against the previous
/// close are not included, so on gapping markets this reads lower than
/// the classic true-range average.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    pub fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let ranges: Vec<f64> = bars.iter().map(|b| b.high - b.low).collect();
        rolling_mean(&ranges, self.period)
    }
}
