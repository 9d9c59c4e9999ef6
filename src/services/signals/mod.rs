//! Trading signals service module.
//!
//! Turns a raw bar series into a scored LONG / SHORT / WAIT recommendation:
//! the normalizer validates and localizes the series, the indicator pipeline
//! derives feature columns, and the scoring, liveness and risk stages read
//! the last bar.

pub mod engine;
pub mod indicators;
pub mod liveness;
pub mod normalizer;
pub mod pipeline;
pub mod risk;
pub mod scoring;

pub use engine::{EngineConfig, SignalEngine};
pub use liveness::LivenessClassifier;
pub use normalizer::SeriesNormalizer;
pub use pipeline::{FeatureFrame, IndicatorParams};
pub use risk::{Bias, RiskCalculator, RiskLevels};
pub use scoring::{ScoreBreakdown, ScoringEngine};
