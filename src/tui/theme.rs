//! Theme and color definitions for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::types::Action;

/// Theme for the TUI with consistent color scheme.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub long: Color,
    pub short: Color,
    pub wait: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Magenta,
            long: Color::Green,
            short: Color::Red,
            wait: Color::Yellow,
            muted: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Get style for titles.
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for headers.
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for muted text.
    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Get style for borders.
    pub fn border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Border of the selected card.
    pub fn border_selected(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn action_color(&self, action: Action) -> Color {
        match action {
            Action::Long => self.long,
            Action::Short => self.short,
            Action::Wait => self.wait,
        }
    }

    /// Inverted badge for an action.
    pub fn action_badge(&self, action: Action) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.action_color(action))
            .add_modifier(Modifier::BOLD)
    }

    /// Green for gains, red for losses.
    pub fn change(&self, pct: f64) -> Style {
        Style::default().fg(if pct >= 0.0 { self.long } else { self.short })
    }

    /// Stop/target levels, dimmed while the action is WAIT.
    pub fn level(&self, color: Color, active: bool) -> Style {
        if active {
            Style::default().fg(color)
        } else {
            self.muted().add_modifier(Modifier::DIM)
        }
    }

    /// Overlay when the market is closed or data is stale.
    pub fn closed(&self) -> Style {
        Style::default()
            .fg(self.wait)
            .add_modifier(Modifier::BOLD)
    }

    /// Score gauge color: green at the long end, red at the short end.
    pub fn score(&self, score: u8) -> Style {
        let color = match score {
            60..=100 => self.long,
            0..=40 => self.short,
            _ => self.wait,
        };
        Style::default().fg(color)
    }
}
