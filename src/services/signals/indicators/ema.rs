//! Exponential Moving Average (EMA) indicator.

/// EMA (Exponential Moving Average) indicator.
///
/// Recursive smoothing with `alpha = 2 / (period + 1)`, seeded with the first
/// value and without bias correction, so every bar has a value.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn name(&self) -> String {
        format!("EMA ({})", self.period)
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// EMA column over `values`.
    pub fn compute(&self, values: &[f64]) -> Vec<f64> {
        let alpha = self.alpha();
        let mut out = Vec::with_capacity(values.len());
        let mut iter = values.iter();

        let Some(&first) = iter.next() else {
            return out;
        };

        let mut ema = first;
        out.push(ema);
        for &value in iter {
            ema = alpha * value + (1.0 - alpha) * ema;
            out.push(ema);
        }

        out
    }
}
