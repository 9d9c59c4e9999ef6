//! Sniper - technical-indicator signal engine for a fixed watchlist
//!
//! Fetches intraday bars, scores each instrument LONG / SHORT / WAIT, and
//! serves the latest board over JSON and a terminal dashboard.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod tui;
pub mod types;

use std::sync::Arc;

use config::Config;
use services::SignalService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<SignalService>,
}

// Re-export commonly used types
pub use error::{AppError, EngineError};
pub use types::*;
