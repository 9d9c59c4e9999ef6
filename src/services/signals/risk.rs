//! Stop-loss / take-profit levels from ATR.

use serde::{Deserialize, Serialize};

/// Direction implied by the score, ignoring the WAIT deadband.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Long,
    Short,
}

impl Bias {
    /// Scores above 50 lean long; 50 and below lean short.
    pub fn from_score(score: u8) -> Self {
        if score > 50 {
            Bias::Long
        } else {
            Bias::Short
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLevels {
    pub bias: Bias,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Places the stop `stop_atr` ATRs against the bias and the target
/// `target_atr` ATRs with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskCalculator {
    stop_atr: f64,
    target_atr: f64,
}

impl Default for RiskCalculator {
    fn default() -> Self {
        Self {
            stop_atr: 2.0,
            target_atr: 3.0,
        }
    }
}

impl RiskCalculator {
    pub fn new(stop_atr: f64, target_atr: f64) -> Self {
        Self {
            stop_atr,
            target_atr,
        }
    }

    /// Reward distance over risk distance.
    pub fn reward_ratio(&self) -> f64 {
        self.target_atr / self.stop_atr
    }

    pub fn levels(&self, close: f64, atr: f64, score: u8) -> RiskLevels {
        let bias = Bias::from_score(score);
        let stop = self.stop_atr * atr;
        let target = self.target_atr * atr;

        let (stop_loss, take_profit) = match bias {
            Bias::Long => (close - stop, close + target),
            Bias::Short => (close + stop, close - target),
        };

        RiskLevels {
            bias,
            stop_loss,
            take_profit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_levels() {
        let levels = RiskCalculator::default().levels(50.0, 0.5, 70);
        assert_eq!(levels.bias, Bias::Long);
        assert_eq!(levels.stop_loss, 49.0);
        assert_eq!(levels.take_profit, 51.5);
    }

    #[test]
    fn test_short_levels() {
        let levels = RiskCalculator::default().levels(50.0, 0.5, 30);
        assert_eq!(levels.bias, Bias::Short);
        assert_eq!(levels.stop_loss, 51.0);
        assert_eq!(levels.take_profit, 48.5);
    }

    #[test]
    fn test_fifty_is_short_biased() {
        assert_eq!(Bias::from_score(50), Bias::Short);
        assert_eq!(Bias::from_score(51), Bias::Long);
    }

    #[test]
    fn test_reward_ratio_is_one_and_a_half() {
        let calc = RiskCalculator::default();
        assert_eq!(calc.reward_ratio(), 1.5);
        for (close, atr, score) in [(50.0, 0.5, 70), (1.0842, 0.0007, 45), (2350.0, 4.25, 51)] {
            let levels = calc.levels(close, atr, score);
            let reward = (levels.take_profit - close).abs();
            let risk = (levels.stop_loss - close).abs();
            assert!((reward / risk - 1.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_custom_multipliers() {
        let levels = RiskCalculator::new(1.5, 3.0).levels(100.0, 2.0, 80);
        assert_eq!(levels.stop_loss, 97.0);
        assert_eq!(levels.take_profit, 106.0);
    }
}
