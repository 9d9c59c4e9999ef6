//! Bollinger Bands indicator.

use super::{rolling_mean, rolling_std};

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(20)
/// - Upper band: SMA + 2 * StdDev
/// - Lower band: SMA - 2 * StdDev
///
/// The deviation is the sample standard deviation of the trailing window.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

/// Band columns, aligned with the input.
#[derive(Debug, Clone)]
pub struct BollingerColumns {
    pub middle: Vec<f64>,
    pub std_dev: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    pub fn min_periods(&self) -> usize {
        self.period
    }

    pub fn compute(&self, closes: &[f64]) -> BollingerColumns {
        let middle = rolling_mean(closes, self.period);
        let std_dev = rolling_std(closes, self.period);

        let upper = middle
            .iter()
            .zip(&std_dev)
            .map(|(m, s)| m + self.std_dev_multiplier * s)
            .collect();
        let lower = middle
            .iter()
            .zip(&std_dev)
            .map(|(m, s)| m - self.std_dev_multiplier * s)
            .collect();

        BollingerColumns {
            middle,
            std_dev,
            upper,
            lower,
        }
    }
}
