use serde::{Deserialize, Serialize};

use super::{ChartPoint, Instrument, LastBar};

/// Trade recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Long,
    Short,
    Wait,
}

impl Action {
    /// Get display label for this action.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Long => "LONG",
            Action::Short => "SHORT",
            Action::Wait => "WAIT",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How far past its threshold a directional score sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conviction {
    Strong,
    Standard,
}

/// Score boundaries for the action classification.
///
/// `score >= long` is LONG, `score <= short` is SHORT, everything between is
/// WAIT. The optional strong tiers only grade conviction; they never change
/// the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdTable {
    pub long: u8,
    pub short: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strong_long: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strong_short: Option<u8>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ThresholdTable {
    pub const fn balanced() -> Self {
        Self::two_tier(60, 40)
    }

    pub const fn conservative() -> Self {
        Self::two_tier(65, 35)
    }

    pub const fn aggressive() -> Self {
        Self::two_tier(55, 45)
    }

    /// Four-tier 75/55/45/25 table.
    pub const fn tiered() -> Self {
        Self {
            long: 55,
            short: 45,
            strong_long: Some(75),
            strong_short: Some(25),
        }
    }

    pub const fn two_tier(long: u8, short: u8) -> Self {
        Self {
            long,
            short,
            strong_long: None,
            strong_short: None,
        }
    }

    /// Parse a preset name or `long/short[/strong_long/strong_short]`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => return Some(Self::balanced()),
            "conservative" => return Some(Self::conservative()),
            "aggressive" => return Some(Self::aggressive()),
            "tiered" | "four_tier" => return Some(Self::tiered()),
            _ => {}
        }

        let values: Vec<u8> = s
            .split('/')
            .map(|p| p.trim().parse::<u8>().ok())
            .collect::<Option<Vec<_>>>()?;

        let table = match values.as_slice() {
            [long, short] => Self::two_tier(*long, *short),
            [strong_long, long, short, strong_short] => Self {
                long: *long,
                short: *short,
                strong_long: Some(*strong_long),
                strong_short: Some(*strong_short),
            },
            _ => return None,
        };

        table.is_valid().then_some(table)
    }

    /// Boundaries must leave LONG and SHORT disjoint and stay inside 0..=100.
    pub fn is_valid(&self) -> bool {
        let core = self.short < self.long && self.long <= 100;
        let strong_long = self.strong_long.map_or(true, |s| s >= self.long && s <= 100);
        let strong_short = self.strong_short.map_or(true, |s| s <= self.short);
        core && strong_long && strong_short
    }
}

/// Indicator values at the last bar, all finite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSnapshot {
    pub close: f64,
    pub ema_trend: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub rsi: f64,
    pub sma_mid: f64,
    pub std_mid: f64,
    pub band_upper: f64,
    pub band_lower: f64,
    pub atr: f64,
    pub pct_change: f64,
    /// False when the series was too short for a full day of bars and the
    /// change is measured from the start of the window instead.
    pub pct_change_full_day: bool,
}

/// The engine's per-cycle output for one instrument.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    /// Bounded confidence score 0-100.
    pub score: u8,
    pub action: Action,
    pub conviction: Conviction,
    pub is_live: bool,
    pub stop_loss: f64,
    pub take_profit: f64,
}

impl Signal {
    /// Stop/target are advisory only while waiting.
    pub fn risk_active(&self) -> bool {
        self.action != Action::Wait
    }
}

/// Everything a renderer needs for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub instrument: Instrument,
    pub signal: Signal,
    pub features: FeatureSnapshot,
    pub last_bar: LastBar,
    /// Trailing bars for sparkline/candlestick charts, oldest first.
    pub chart: Vec<ChartPoint>,
    /// Unix timestamp (milliseconds) when computed.
    pub computed_at: i64,
}

/// Latest state of one instrument on the signal board.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SymbolView {
    Ready {
        report: Box<SignalReport>,
        updated_at: i64,
    },
    Unavailable {
        instrument: Instrument,
        reason: String,
        updated_at: i64,
    },
}

impl SymbolView {
    pub fn instrument(&self) -> &Instrument {
        match self {
            SymbolView::Ready { report, .. } => &report.instrument,
            SymbolView::Unavailable { instrument, .. } => instrument,
        }
    }

    pub fn report(&self) -> Option<&SignalReport> {
        match self {
            SymbolView::Ready { report, .. } => Some(report),
            SymbolView::Unavailable { .. } => None,
        }
    }

    pub fn updated_at(&self) -> i64 {
        match self {
            SymbolView::Ready { updated_at, .. } | SymbolView::Unavailable { updated_at, .. } => {
                *updated_at
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_serialization() {
        assert_eq!(serde_json::to_string(&Action::Long).unwrap(), "\"LONG\"");
        assert_eq!(serde_json::to_string(&Action::Wait).unwrap(), "\"WAIT\"");
        let parsed: Action = serde_json::from_str("\"SHORT\"").unwrap();
        assert_eq!(parsed, Action::Short);
    }

    #[test]
    fn test_threshold_presets() {
        assert_eq!(ThresholdTable::parse("balanced"), Some(ThresholdTable::two_tier(60, 40)));
        assert_eq!(ThresholdTable::parse("Conservative"), Some(ThresholdTable::two_tier(65, 35)));
        assert_eq!(ThresholdTable::parse("aggressive"), Some(ThresholdTable::two_tier(55, 45)));
        let tiered = ThresholdTable::parse("tiered").unwrap();
        assert_eq!(tiered.strong_long, Some(75));
        assert_eq!(tiered.strong_short, Some(25));
    }

    #[test]
    fn test_threshold_custom_values() {
        assert_eq!(ThresholdTable::parse("70/30"), Some(ThresholdTable::two_tier(70, 30)));
        assert_eq!(ThresholdTable::parse("75/55/45/25"), Some(ThresholdTable::tiered()));
    }

    #[test]
    fn test_threshold_rejects_overlap() {
        assert!(ThresholdTable::parse("40/60").is_none());
        assert!(ThresholdTable::parse("50/50").is_none());
        assert!(ThresholdTable::parse("50/55/45/60").is_none());
        assert!(ThresholdTable::parse("nonsense").is_none());
        assert!(ThresholdTable::parse("60").is_none());
    }

    #[test]
    fn test_risk_active_only_for_directional_actions() {
        let mut signal = Signal {
            score: 70,
            action: Action::Long,
            conviction: Conviction::Standard,
            is_live: true,
            stop_loss: 49.0,
            take_profit: 51.5,
        };
        assert!(signal.risk_active());
        signal.action = Action::Wait;
        assert!(!signal.risk_active());
    }
}
