//! Signal engine: normalize → derive → score → size risk.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::EngineError;
use crate::types::{Instrument, LastBar, RawSeries, Series, Signal, SignalReport, ThresholdTable};

use super::liveness::LivenessClassifier;
use super::normalizer::SeriesNormalizer;
use super::pipeline::{FeatureFrame, IndicatorParams};
use super::risk::RiskCalculator;
use super::scoring::ScoringEngine;

/// Engine parameters. `Default` is the canonical 15-minute configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub min_bars: usize,
    pub display_tz: Tz,
    pub stale_after: Duration,
    pub thresholds: ThresholdTable,
    pub stop_atr: f64,
    pub target_atr: f64,
    /// Trailing bars exported for charts.
    pub chart_bars: usize,
    pub indicators: IndicatorParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_bars: 50,
            display_tz: chrono_tz::Europe::Prague,
            stale_after: Duration::minutes(120),
            thresholds: ThresholdTable::balanced(),
            stop_atr: 2.0,
            target_atr: 3.0,
            chart_bars: 100,
            indicators: IndicatorParams::default(),
        }
    }
}

/// Pure per-instrument signal computation.
///
/// Holds configuration only; `analyze` has no side effects and depends on
/// nothing but its arguments.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    normalizer: SeriesNormalizer,
    params: IndicatorParams,
    liveness: LivenessClassifier,
    scoring: ScoringEngine,
    risk: RiskCalculator,
    chart_bars: usize,
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SignalEngine {
    pub fn new(config: EngineConfig) -> Self {
        // Never accept a series whose last bar could still be in warm-up.
        let min_bars = config.min_bars.max(config.indicators.warmup_bars());

        Self {
            normalizer: SeriesNormalizer::new(config.display_tz, min_bars),
            params: config.indicators,
            liveness: LivenessClassifier::new(config.stale_after),
            scoring: ScoringEngine::new(config.thresholds),
            risk: RiskCalculator::new(config.stop_atr, config.target_atr),
            chart_bars: config.chart_bars,
        }
    }

    pub fn display_tz(&self) -> Tz {
        self.normalizer.display_tz()
    }

    pub fn min_bars(&self) -> usize {
        self.normalizer.min_bars()
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    /// Full pipeline from a provider response.
    pub fn analyze(
        &self,
        instrument: &Instrument,
        raw: RawSeries,
        now: DateTime<Utc>,
    ) -> Result<SignalReport, EngineError> {
        let series = self.normalizer.normalize(raw)?;
        self.evaluate(instrument, &series, now)
    }

    /// Pipeline from an already-normalized series.
    pub fn evaluate(
        &self,
        instrument: &Instrument,
        series: &Series,
        now: DateTime<Utc>,
    ) -> Result<SignalReport, EngineError> {
        let last = series.last().ok_or(EngineError::InsufficientData {
            bars: 0,
            required: self.min_bars(),
        })?;

        let frame = FeatureFrame::derive(series, &self.params);
        let features = frame.snapshot(last.close)?;

        let now_local = now.with_timezone(&self.display_tz());
        let is_live = self
            .liveness
            .is_live(last.timestamp, now_local, instrument.continuous_trading);

        let score = self.scoring.score(&features);
        let action = self.scoring.classify(score);
        let conviction = self.scoring.conviction(score, action);
        let levels = self.risk.levels(features.close, features.atr, score);

        debug!(
            symbol = %instrument.symbol,
            score,
            action = %action,
            is_live,
            rsi = features.rsi,
            "Computed signal"
        );

        Ok(SignalReport {
            instrument: instrument.clone(),
            signal: Signal {
                score,
                action,
                conviction,
                is_live,
                stop_loss: levels.stop_loss,
                take_profit: levels.take_profit,
            },
            features,
            last_bar: LastBar::from(last),
            chart: frame.chart_points(series, self.chart_bars),
            computed_at: now.timestamp_millis(),
        })
    }
}
