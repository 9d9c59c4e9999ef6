use chrono_tz::Tz;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::services::{EngineConfig, RefreshSettings};
use crate::services::signals::IndicatorParams;
use crate::types::{Instrument, ThresholdTable};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Bar width in minutes.
    pub bar_interval_minutes: u32,
    /// History window requested from the provider.
    pub lookback_days: u32,
    pub min_bars: usize,
    pub cache_ttl_secs: u64,
    pub stale_after_minutes: i64,
    /// IANA zone used for weekday and liveness decisions.
    pub display_tz: Tz,
    pub thresholds: ThresholdTable,
    pub stop_atr_multiplier: f64,
    pub target_atr_multiplier: f64,
    pub overview_refresh_secs: u64,
    pub focus_refresh_secs: u64,
    /// Trailing bars exported for charts.
    pub chart_bars: usize,
    pub instruments: Vec<Instrument>,
    /// Run the terminal dashboard instead of only the HTTP server.
    pub tui: bool,
    pub log_file: String,
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset or unparsable values fall back to
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Format: "symbol|name|category|continuous;symbol2|..."
        let instruments: Vec<Instrument> = lookup("INSTRUMENTS")
            .map(|s| s.split(';').filter_map(Instrument::parse).collect())
            .unwrap_or_default();

        let thresholds = lookup("SCORE_THRESHOLDS")
            .and_then(|s| ThresholdTable::parse(&s))
            .filter(|t| t.is_valid())
            .unwrap_or_default();

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "PORT").unwrap_or(3001),
            bar_interval_minutes: parse_var(&lookup, "BAR_INTERVAL_MINUTES")
                .filter(|m: &u32| *m > 0)
                .unwrap_or(15),
            lookback_days: parse_var(&lookup, "LOOKBACK_DAYS")
                .filter(|d: &u32| (1..=365).contains(d))
                .unwrap_or(5),
            min_bars: parse_var(&lookup, "MIN_BARS").unwrap_or(50),
            cache_ttl_secs: parse_var(&lookup, "CACHE_TTL_SECS").unwrap_or(30),
            // One week at most
            stale_after_minutes: parse_var(&lookup, "STALE_AFTER_MINUTES")
                .filter(|m: &i64| (1..=10_080).contains(m))
                .unwrap_or(120),
            display_tz: lookup("DISPLAY_TIMEZONE")
                .and_then(|s| s.trim().parse::<Tz>().ok())
                .unwrap_or(chrono_tz::Europe::Prague),
            thresholds,
            stop_atr_multiplier: parse_var(&lookup, "STOP_ATR_MULTIPLIER")
                .filter(|m: &f64| *m > 0.0)
                .unwrap_or(2.0),
            target_atr_multiplier: parse_var(&lookup, "TARGET_ATR_MULTIPLIER")
                .filter(|m: &f64| *m > 0.0)
                .unwrap_or(3.0),
            overview_refresh_secs: parse_var(&lookup, "OVERVIEW_REFRESH_SECS")
                .filter(|s: &u64| (1..=86_400).contains(s))
                .unwrap_or(15),
            focus_refresh_secs: parse_var(&lookup, "FOCUS_REFRESH_SECS")
                .filter(|s: &u64| (1..=86_400).contains(s))
                .unwrap_or(5),
            chart_bars: parse_var(&lookup, "CHART_BARS").unwrap_or(100),
            instruments: if instruments.is_empty() {
                Instrument::default_watchlist()
            } else {
                instruments
            },
            tui: lookup("SNIPER_TUI")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_file: lookup("SNIPER_LOG_FILE").unwrap_or_else(|| "sniper.log".to_string()),
        }
    }

    /// Engine parameters derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            min_bars: self.min_bars,
            display_tz: self.display_tz,
            stale_after: chrono::Duration::minutes(self.stale_after_minutes),
            thresholds: self.thresholds,
            stop_atr: self.stop_atr_multiplier,
            target_atr: self.target_atr_multiplier,
            chart_bars: self.chart_bars,
            indicators: IndicatorParams::for_interval_minutes(self.bar_interval_minutes),
        }
    }

    pub fn refresh_settings(&self) -> RefreshSettings {
        RefreshSettings {
            lookback: chrono::Duration::days(self.lookback_days as i64),
            interval_minutes: self.bar_interval_minutes,
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            overview_every: Duration::from_secs(self.overview_refresh_secs),
            focus_every: Duration::from_secs(self.focus_refresh_secs),
        }
    }
}
