//! Market liveness classification.

use chrono::{DateTime, Datelike, Duration, Weekday};
use chrono_tz::Tz;

/// Decides whether an instrument is actively trading right now.
///
/// Instruments without continuous trading are closed whenever the current
/// time falls on a weekend in the display timezone. Otherwise the market is
/// live while the last bar is younger than `stale_after`.
#[derive(Debug, Clone, Copy)]
pub struct LivenessClassifier {
    stale_after: Duration,
}

impl Default for LivenessClassifier {
    fn default() -> Self {
        Self::new(Duration::minutes(120))
    }
}

impl LivenessClassifier {
    pub fn new(stale_after: Duration) -> Self {
        Self { stale_after }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    pub fn is_live(
        &self,
        last_bar: DateTime<Tz>,
        now: DateTime<Tz>,
        continuous_trading: bool,
    ) -> bool {
        if !continuous_trading && is_weekend(&now) {
            return false;
        }
        now.signed_duration_since(last_bar) < self.stale_after
    }
}

fn is_weekend(ts: &DateTime<Tz>) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}
