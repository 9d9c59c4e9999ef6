//! Composite scoring and action classification.

use serde::{Deserialize, Serialize};

use crate::types::{Action, Conviction, FeatureSnapshot, ThresholdTable};

/// Neutral starting score.
pub const BASELINE_SCORE: f64 = 50.0;

/// Individual score contributions, for display and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub trend: i8,
    pub momentum: i8,
    pub oscillator: i8,
    pub bands: i8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i32 {
        self.trend as i32 + self.momentum as i32 + self.oscillator as i32 + self.bands as i32
    }
}

/// Maps a feature snapshot to a bounded score and an action.
///
/// Stateless: every call recomputes from the snapshot alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    thresholds: ThresholdTable,
}

impl ScoringEngine {
    pub fn new(thresholds: ThresholdTable) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn breakdown(&self, f: &FeatureSnapshot) -> ScoreBreakdown {
        let trend_up = f.close > f.ema_trend;

        let trend = if trend_up { 10 } else { -10 };
        let momentum = if f.macd > f.macd_signal { 10 } else { -10 };

        // RSI reading depends on the trend branch
        let oscillator = if trend_up {
            if f.rsi < 50.0 {
                15
            } else if f.rsi > 70.0 {
                -15
            } else {
                0
            }
        } else if f.rsi > 50.0 {
            -15
        } else if f.rsi < 30.0 {
            15
        } else {
            0
        };

        let mut bands = 0;
        if f.close <= f.band_lower {
            bands += 10;
        }
        if f.close >= f.band_upper {
            bands -= 10;
        }

        ScoreBreakdown {
            trend,
            momentum,
            oscillator,
            bands,
        }
    }

    /// Score clamped to 0..=100 and truncated toward zero.
    pub fn score(&self, f: &FeatureSnapshot) -> u8 {
        let raw = BASELINE_SCORE + self.breakdown(f).total() as f64;
        raw.clamp(0.0, 100.0).trunc() as u8
    }

    pub fn classify(&self, score: u8) -> Action {
        if score >= self.thresholds.long {
            Action::Long
        } else if score <= self.thresholds.short {
            Action::Short
        } else {
            Action::Wait
        }
    }

    pub fn conviction(&self, score: u8, action: Action) -> Conviction {
        let strong = match action {
            Action::Long => self.thresholds.strong_long.is_some_and(|s| score >= s),
            Action::Short => self.thresholds.strong_short.is_some_and(|s| score <= s),
            Action::Wait => false,
        };
        if strong {
            Conviction::Strong
        } else {
            Conviction::Standard
        }
    }
}
