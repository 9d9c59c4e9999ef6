//! Indicator pipeline: normalized series in, feature columns out.

use crate::error::EngineError;
use crate::types::{ChartPoint, FeatureSnapshot, Series};

use super::indicators::{Atr, BollingerBands, Ema, Macd, PercentChange, Rsi};

/// Indicator periods.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub ema_trend_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub band_period: usize,
    pub band_std_dev: f64,
    pub atr_period: usize,
    /// Bars in 24 hours at the configured interval.
    pub bars_per_day: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_trend_period: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            band_period: 20,
            band_std_dev: 2.0,
            atr_period: 14,
            bars_per_day: 96,
        }
    }
}

impl IndicatorParams {
    pub fn for_interval_minutes(minutes: u32) -> Self {
        Self {
            bars_per_day: PercentChange::for_interval_minutes(minutes).bars_per_day(),
            ..Self::default()
        }
    }

    /// Bars needed before every column is defined at the last bar.
    pub fn warmup_bars(&self) -> usize {
        self.rsi_period
            .max(self.band_period)
            .max(self.atr_period)
            .max(2)
    }
}

/// Feature columns aligned with the series bars.
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    pub ema_trend: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub rsi: Vec<f64>,
    pub sma_mid: Vec<f64>,
    pub std_mid: Vec<f64>,
    pub band_upper: Vec<f64>,
    pub band_lower: Vec<f64>,
    pub atr: Vec<f64>,
    pub pct_change: f64,
    pub pct_change_full_day: bool,
}

impl FeatureFrame {
    /// Derive every indicator from `series`. Pure: same input, same bits out.
    pub fn derive(series: &Series, params: &IndicatorParams) -> Self {
        let closes = series.closes();

        let ema_trend = Ema::new(params.ema_trend_period).compute(&closes);
        let macd = Macd::new(params.macd_fast, params.macd_slow, params.macd_signal).compute(&closes);
        let rsi = Rsi::new(params.rsi_period).compute(&closes);
        let bands = BollingerBands::new(params.band_period, params.band_std_dev).compute(&closes);
        let atr = Atr::new(params.atr_period).compute(series.bars());
        let change = PercentChange::new(params.bars_per_day).compute(&closes);

        Self {
            ema_trend,
            macd: macd.macd,
            macd_signal: macd.signal,
            rsi,
            sma_mid: bands.middle,
            std_mid: bands.std_dev,
            band_upper: bands.upper,
            band_lower: bands.lower,
            atr,
            pct_change: change.map_or(f64::NAN, |c| c.pct),
            pct_change_full_day: change.is_some_and(|c| c.full_day),
        }
    }

    pub fn len(&self) -> usize {
        self.ema_trend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ema_trend.is_empty()
    }

    /// Values at the last bar.
    ///
    /// Any non-finite value makes the instrument non-scorable this cycle, as
    /// do inverted bands.
    pub fn snapshot(&self, close: f64) -> Result<FeatureSnapshot, EngineError> {
        let last = |column: &[f64], name: &'static str| -> Result<f64, EngineError> {
            column
                .last()
                .copied()
                .filter(|v| v.is_finite())
                .ok_or(EngineError::IndicatorUndefined(name))
        };

        if !close.is_finite() {
            return Err(EngineError::IndicatorUndefined("close"));
        }

        let snapshot = FeatureSnapshot {
            close,
            ema_trend: last(&self.ema_trend, "ema_trend")?,
            macd: last(&self.macd, "macd")?,
            macd_signal: last(&self.macd_signal, "macd_signal")?,
            rsi: last(&self.rsi, "rsi")?,
            sma_mid: last(&self.sma_mid, "sma_mid")?,
            std_mid: last(&self.std_mid, "std_mid")?,
            band_upper: last(&self.band_upper, "band_upper")?,
            band_lower: last(&self.band_lower, "band_lower")?,
            atr: last(&self.atr, "atr")?,
            pct_change: if self.pct_change.is_finite() {
                self.pct_change
            } else {
                return Err(EngineError::IndicatorUndefined("pct_change"));
            },
            pct_change_full_day: self.pct_change_full_day,
        };

        if snapshot.band_upper < snapshot.band_lower {
            return Err(EngineError::IndicatorUndefined("bollinger"));
        }

        Ok(snapshot)
    }

    /// Trailing `count` bars with their overlay columns.
    pub fn chart_points(&self, series: &Series, count: usize) -> Vec<ChartPoint> {
        let finite = |v: f64| v.is_finite().then_some(v);
        let start = series.len().saturating_sub(count);

        series.bars()[start..]
            .iter()
            .enumerate()
            .map(|(offset, bar)| {
                let i = start + offset;
                ChartPoint {
                    time: bar.timestamp.timestamp_millis(),
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    ema_trend: self.ema_trend.get(i).copied().and_then(finite),
                    band_upper: self.band_upper.get(i).copied().and_then(finite),
                    band_lower: self.band_lower.get(i).copied().and_then(finite),
                }
            })
            .collect()
    }
}
