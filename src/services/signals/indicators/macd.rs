//! MACD (Moving Average Convergence Divergence) indicator.

use super::Ema;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD output columns, aligned with the input.
#[derive(Debug, Clone)]
pub struct MacdColumns {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    pub fn compute(&self, closes: &[f64]) -> MacdColumns {
        let fast = Ema::new(self.fast_period).compute(closes);
        let slow = Ema::new(self.slow_period).compute(closes);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = Ema::new(self.signal_period).compute(&macd);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdColumns {
            macd,
            signal,
            histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::linear;

    #[test]
    fn test_macd_columns_aligned() {
        let closes = linear(60, 100.0, 0.5);
        let out = Macd::default().compute(&closes);
        assert_eq!(out.macd.len(), 60);
        assert_eq!(out.signal.len(), 60);
        assert_eq!(out.histogram.len(), 60);
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let closes = linear(200, 100.0, 0.5);
        let out = Macd::default().compute(&closes);
        let last = closes.len() - 1;
        assert!(out.macd[last] > 0.0);
        assert!(out.macd[last] > out.signal[last]);
    }

    #[test]
    fn test_macd_negative_in_downtrend() {
        let closes = linear(200, 200.0, -0.5);
        let out = Macd::default().compute(&closes);
        assert!(out.macd[199] < 0.0);
        assert!(out.macd[199] < out.signal[199]);
    }

    #[test]
    fn test_macd_first_bar_is_zero() {
        let out = Macd::default().compute(&[50.0, 51.0]);
        assert_eq!(out.macd[0], 0.0);
        assert_eq!(out.signal[0], 0.0);
    }
}
