//! Rolling percent change of the latest close.

/// Percent change of the last close against the close one trading day back.
///
/// When the series holds no more than one day of bars, the reference moves
/// to `len - (len - 1)`, i.e. the second bar of the window.
pub struct PercentChange {
    bars_per_day: usize,
}

/// Result of [`PercentChange::compute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceChange {
    pub pct: f64,
    /// Whether the reference bar is a full day back.
    pub full_day: bool,
}

impl PercentChange {
    pub fn new(bars_per_day: usize) -> Self {
        Self { bars_per_day }
    }

    /// Bars per day for the given bar interval in minutes.
    pub fn for_interval_minutes(minutes: u32) -> Self {
        let minutes = minutes.max(1) as usize;
        Self::new((24 * 60 / minutes).max(1))
    }

    pub fn bars_per_day(&self) -> usize {
        self.bars_per_day
    }

    /// `None` when fewer than two closes are available.
    pub fn compute(&self, closes: &[f64]) -> Option<PriceChange> {
        let len = closes.len();
        if len < 2 {
            return None;
        }

        let full_day = len > self.bars_per_day;
        let lookback = if full_day { self.bars_per_day } else { len - 1 };
        let reference = closes[len - lookback];
        let current = closes[len - 1];

        let pct = if reference == 0.0 {
            f64::NAN
        } else {
            (current - reference) / reference * 100.0
        };

        Some(PriceChange { pct, full_day })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_per_day_for_15m() {
        assert_eq!(PercentChange::for_interval_minutes(15).bars_per_day(), 96);
        assert_eq!(PercentChange::for_interval_minutes(5).bars_per_day(), 288);
        assert_eq!(PercentChange::for_interval_minutes(60).bars_per_day(), 24);
    }

    #[test]
    fn test_full_day_reference() {
        let closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64).collect();
        let change = PercentChange::new(96).compute(&closes).unwrap();
        assert!(change.full_day);
        // reference index 200 - 96 = 104 -> close 204, current 299
        let expected = (299.0 - 204.0) / 204.0 * 100.0;
        assert!((change.pct - expected).abs() < 1e-12);
    }

    #[test]
    fn test_short_series_falls_back_to_second_bar() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let change = PercentChange::new(96).compute(&closes).unwrap();
        assert!(!change.full_day);
        let expected = (159.0 - 101.0) / 101.0 * 100.0;
        assert!((change.pct - expected).abs() < 1e-12);
    }

    #[test]
    fn test_exactly_one_day_uses_fallback() {
        let closes = vec![100.0; 96];
        let change = PercentChange::new(96).compute(&closes).unwrap();
        assert!(!change.full_day);
        assert_eq!(change.pct, 0.0);
    }

    #[test]
    fn test_single_close_has_no_change() {
        assert!(PercentChange::new(96).compute(&[100.0]).is_none());
    }

    #[test]
    fn test_negative_change() {
        let closes = vec![100.0, 100.0, 90.0];
        let change = PercentChange::new(96).compute(&closes).unwrap();
        assert!((change.pct + 10.0).abs() < 1e-12);
    }
}
