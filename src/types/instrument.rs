use serde::{Deserialize, Serialize};

/// Asset class used for grouping on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentCategory {
    Forex,
    Commodity,
    Crypto,
    Futures,
    Equity,
}

impl InstrumentCategory {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "forex" | "fx" => Some(Self::Forex),
            "commodity" | "commodities" | "metal" => Some(Self::Commodity),
            "crypto" | "cryptocurrency" => Some(Self::Crypto),
            "futures" | "future" | "index" => Some(Self::Futures),
            "equity" | "stock" | "etf" => Some(Self::Equity),
            _ => None,
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Forex => "Forex",
            Self::Commodity => "Commodity",
            Self::Crypto => "Crypto",
            Self::Futures => "Futures",
            Self::Equity => "Equity",
        }
    }
}

/// Per-instrument metadata supplied by configuration.
///
/// `continuous_trading` is explicit: nothing in the engine looks at the
/// shape of the symbol string to guess the trading calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Provider symbol, e.g. "EURUSD=X".
    pub symbol: String,
    pub display_name: String,
    pub category: InstrumentCategory,
    /// Trades around the clock including weekends.
    pub continuous_trading: bool,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        category: InstrumentCategory,
        continuous_trading: bool,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
            category,
            continuous_trading,
        }
    }

    /// Parse `symbol|name|category|continuous`.
    ///
    /// Name defaults to the symbol, category to equity, continuous to false.
    pub fn parse(spec: &str) -> Option<Self> {
        let parts: Vec<&str> = spec.split('|').map(str::trim).collect();
        let symbol = *parts.first().filter(|s| !s.is_empty())?;
        let display_name = parts
            .get(1)
            .filter(|s| !s.is_empty())
            .copied()
            .unwrap_or(symbol);
        let category = parts
            .get(2)
            .and_then(|c| InstrumentCategory::from_str(c))
            .unwrap_or(InstrumentCategory::Equity);
        let continuous_trading = parts
            .get(3)
            .map(|c| matches!(c.to_lowercase().as_str(), "true" | "1" | "yes" | "24/7"))
            .unwrap_or(false);

        Some(Self::new(symbol, display_name, category, continuous_trading))
    }

    /// Instruments watched when nothing is configured.
    pub fn default_watchlist() -> Vec<Self> {
        vec![
            Self::new("EURUSD=X", "EUR/USD", InstrumentCategory::Forex, false),
            Self::new("GBPUSD=X", "GBP/USD", InstrumentCategory::Forex, false),
            Self::new("JPY=X", "USD/JPY", InstrumentCategory::Forex, false),
            Self::new("GC=F", "GOLD", InstrumentCategory::Commodity, false),
            Self::new("BTC-USD", "BITCOIN", InstrumentCategory::Crypto, true),
            Self::new("ES=F", "S&P 500", InstrumentCategory::Futures, false),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_spec() {
        let inst = Instrument::parse("BTC-USD|BITCOIN|crypto|true").unwrap();
        assert_eq!(inst.symbol, "BTC-USD");
        assert_eq!(inst.display_name, "BITCOIN");
        assert_eq!(inst.category, InstrumentCategory::Crypto);
        assert!(inst.continuous_trading);
    }

    #[test]
    fn test_parse_symbol_only() {
        let inst = Instrument::parse("AAPL").unwrap();
        assert_eq!(inst.display_name, "AAPL");
        assert_eq!(inst.category, InstrumentCategory::Equity);
        assert!(!inst.continuous_trading);
    }

    #[test]
    fn test_parse_empty_rejected() {
        assert!(Instrument::parse("").is_none());
        assert!(Instrument::parse(" |name").is_none());
    }

    #[test]
    fn test_continuous_flag_not_inferred_from_symbol() {
        let inst = Instrument::parse("BTC-USD|BITCOIN|crypto").unwrap();
        assert!(!inst.continuous_trading);
    }

    #[test]
    fn test_default_watchlist_only_crypto_continuous() {
        let list = Instrument::default_watchlist();
        assert_eq!(list.len(), 6);
        let continuous: Vec<_> = list.iter().filter(|i| i.continuous_trading).collect();
        assert_eq!(continuous.len(), 1);
        assert_eq!(continuous[0].symbol, "BTC-USD");
    }
}
