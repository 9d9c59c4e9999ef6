//! Technical indicator implementations.
//!
//! Every indicator returns a full column aligned with its input. Bars inside
//! an indicator's warm-up window hold `f64::NAN`.

pub mod atr;
pub mod bollinger;
pub mod change;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::Atr;
pub use bollinger::{BollingerBands, BollingerColumns};
pub use change::{PercentChange, PriceChange};
pub use ema::Ema;
pub use macd::{Macd, MacdColumns};
pub use rsi::Rsi;

/// Trailing simple mean over `window` values.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        out[i] = slice.iter().sum::<f64>() / window as f64;
    }
    out
}

/// Trailing sample standard deviation (n - 1 denominator).
pub(crate) fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if window < 2 {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance =
            slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = variance.sqrt();
    }
    out
}
