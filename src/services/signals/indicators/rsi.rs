//! Relative Strength Index (RSI) indicator.

use super::rolling_mean;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Gains and losses are averaged with a plain rolling mean over the window
/// rather than Wilder's recursive smoothing. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
///
/// A window without losses yields 100.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Index of the first defined value.
    pub fn min_periods(&self) -> usize {
        self.period
    }

    pub fn compute(&self, closes: &[f64]) -> Vec<f64> {
        // The first bar has no predecessor and contributes a zero change.
        let mut gains = Vec::with_capacity(closes.len());
        let mut losses = Vec::with_capacity(closes.len());
        for i in 0..closes.len() {
            let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&gain, &loss)| Self::from_averages(gain, loss))
            .collect()
    }

    fn from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
        if avg_gain.is_nan() || avg_loss.is_nan() {
            return f64::NAN;
        }
        if avg_loss == 0.0 {
            return 100.0;
        }
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}
