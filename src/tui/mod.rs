//! Terminal dashboard for the signal board.

mod app;
mod dashboard;
mod detail;
mod events;
mod theme;

pub use app::{run_tui, App};
pub use theme::Theme;

use crate::services::View;
use crate::types::Instrument;

/// Route/View enum for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Detail,
}

impl Route {
    /// Get the route name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "Overview",
            Self::Detail => "Detail",
        }
    }
}

/// Which screen is showing and which instrument is selected.
///
/// Owned by the renderer; the engine never sees it. Every change that
/// affects what should be refreshed is reported as a [`View`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    route: Route,
    selected: usize,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            route: Route::Dashboard,
            selected: 0,
        }
    }
}

impl Navigation {
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the cursor down, wrapping. Overview only.
    pub fn select_next(&mut self, count: usize) {
        if self.route == Route::Dashboard && count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    /// Move the cursor up, wrapping. Overview only.
    pub fn select_prev(&mut self, count: usize) {
        if self.route == Route::Dashboard && count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    /// Open the selected instrument. `None` if already there or nothing to open.
    pub fn enter(&mut self, instruments: &[Instrument]) -> Option<View> {
        if self.route == Route::Detail {
            return None;
        }
        let instrument = instruments.get(self.selected)?;
        self.route = Route::Detail;
        Some(View::Focus(instrument.symbol.clone()))
    }

    /// Return to the overview. `None` if already there.
    pub fn back(&mut self) -> Option<View> {
        if self.route == Route::Dashboard {
            return None;
        }
        self.route = Route::Dashboard;
        Some(View::Overview)
    }

    /// Undo a route change the scheduler never received.
    fn restore(&mut self, route: Route) {
        self.route = route;
    }

    /// Refresh target for the current screen.
    pub fn view(&self, instruments: &[Instrument]) -> View {
        match (self.route, instruments.get(self.selected)) {
            (Route::Detail, Some(instrument)) => View::Focus(instrument.symbol.clone()),
            _ => View::Overview,
        }
    }
}
