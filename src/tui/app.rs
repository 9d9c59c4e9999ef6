//! Main TUI application logic.

use super::{dashboard, detail, events, Navigation, Route, Theme};
use crate::services::{Command, SchedulerHandle};
use crate::AppState;
use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame, Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tracing::debug;

/// Main TUI application.
pub struct App {
    nav: Navigation,
    app_state: Arc<AppState>,
    scheduler: SchedulerHandle,
    theme: Theme,
    should_quit: bool,
}

impl App {
    /// Create a new TUI application.
    pub fn new(app_state: Arc<AppState>, scheduler: SchedulerHandle) -> Self {
        Self {
            nav: Navigation::default(),
            app_state,
            scheduler,
            theme: Theme::default(),
            should_quit: false,
        }
    }

    pub fn navigation(&self) -> &Navigation {
        &self.nav
    }

    /// Map a key to a navigation change and the scheduler command it implies.
    pub fn on_key(&mut self, key: &KeyEvent) -> Option<Command> {
        let instruments = self.app_state.service.instruments();

        if events::is_quit(key) {
            self.should_quit = true;
            return None;
        }

        if events::is_back(key) {
            return self.nav.back().map(Command::Navigate);
        }

        match key.code {
            KeyCode::Down => self.nav.select_next(instruments.len()),
            KeyCode::Up => self.nav.select_prev(instruments.len()),
            KeyCode::Enter => return self.nav.enter(instruments).map(Command::Navigate),
            KeyCode::Char('r') => {
                return Some(match self.nav.view(instruments) {
                    crate::services::View::Focus(symbol) => Command::Refresh(symbol),
                    crate::services::View::Overview => Command::RefreshAll,
                });
            }
            _ => {}
        }
        None
    }

    /// Handle an event.
    pub fn handle_event(&mut self, event: events::Event) {
        match event {
            events::Event::Key(key) => {
                let previous = self.nav.route();
                if let Some(command) = self.on_key(&key) {
                    debug!(?command, "TUI command");
                    let navigating = matches!(command, Command::Navigate(_));
                    if !self.scheduler.try_send(command) {
                        debug!("Scheduler busy or stopped; command dropped");
                        // Keep the screen and the refresh cadence in agreement
                        if navigating {
                            self.nav.restore(previous);
                        }
                    }
                }
            }
            events::Event::Tick => {
                // Board is read on every render
            }
            events::Event::Resize(_, _) => {
                // Terminal will handle resize automatically
            }
        }
    }

    /// Check if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        match self.nav.route() {
            Route::Dashboard => {
                dashboard::render(frame, chunks[0], &self.app_state, &self.nav, &self.theme)
            }
            Route::Detail => {
                detail::render(frame, chunks[0], &self.app_state, &self.nav, &self.theme)
            }
        }

        self.render_status_bar(frame, chunks[1]);
    }

    /// Render status bar.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let settings = self.app_state.service.settings();
        let every = match self.nav.route() {
            Route::Dashboard => settings.overview_every,
            Route::Detail => settings.focus_every,
        };

        let mut spans = vec![
            Span::styled("Sniper", self.theme.title()),
            Span::raw(" | "),
            Span::styled(self.nav.route().name(), self.theme.header()),
            Span::raw(format!(" every {}s | ", every.as_secs())),
        ];
        let keys: &[(&str, &str)] = match self.nav.route() {
            Route::Dashboard => &[("↑/↓", "select"), ("Enter", "detail"), ("r", "refresh"), ("q", "quit")],
            Route::Detail => &[("Esc", "back"), ("r", "refresh"), ("q", "quit")],
        };
        for (key, action) in keys {
            spans.push(Span::styled(*key, self.theme.muted()));
            spans.push(Span::raw(format!(" {}  ", action)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());
        let inner = block.inner(area);

        frame.render_widget(block, area);
        frame.render_widget(Line::from(spans), inner);
    }
}

/// Run the TUI application.
pub async fn run_tui(app_state: Arc<AppState>, scheduler: SchedulerHandle) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(app_state, scheduler);
    let mut event_handler = events::EventHandler::new(Duration::from_millis(250));

    // Main loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| app.render(f)) {
            break Err(e);
        }

        match event_handler.next().await {
            Some(event) => app.handle_event(event),
            None => break Ok(()),
        }

        if app.should_quit() {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::signals::tests::state;
    use crate::services::{Scheduler, View};
    use crossterm::event::KeyModifiers;
    use tokio::sync::watch;

    fn app() -> App {
        let state = Arc::new(state());
        let (_tx, rx) = watch::channel(false);
        let (_scheduler, handle) = Scheduler::new(state.service.clone(), rx);
        App::new(state, handle)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_enter_navigates_to_focus() {
        let mut app = app();
        assert_eq!(app.on_key(&key(KeyCode::Down)), None);
        assert_eq!(
            app.on_key(&key(KeyCode::Enter)),
            Some(Command::Navigate(View::Focus("BTC-USD".to_string())))
        );
        assert_eq!(app.navigation().route(), Route::Detail);
        assert_eq!(
            app.on_key(&key(KeyCode::Char('r'))),
            Some(Command::Refresh("BTC-USD".to_string()))
        );
        assert_eq!(
            app.on_key(&key(KeyCode::Esc)),
            Some(Command::Navigate(View::Overview))
        );
    }

    #[test]
    fn test_refresh_on_overview_refreshes_all() {
        let mut app = app();
        assert_eq!(app.on_key(&key(KeyCode::Char('r'))), Some(Command::RefreshAll));
        assert_eq!(app.on_key(&key(KeyCode::Backspace)), None);
    }

    #[test]
    fn test_navigation_follows_scheduler() {
        let state = Arc::new(state());
        let (_tx, rx) = watch::channel(false);
        let (scheduler, handle) = Scheduler::new(state.service.clone(), rx);
        let mut app = App::new(state, handle);

        app.handle_event(events::Event::Key(key(KeyCode::Enter)));
        assert_eq!(app.navigation().route(), Route::Detail);
        drop(scheduler);
    }

    #[test]
    fn test_dropped_navigate_keeps_route() {
        // app() drops the scheduler, so every send fails
        let mut app = app();
        app.handle_event(events::Event::Key(key(KeyCode::Enter)));
        assert_eq!(app.navigation().route(), Route::Dashboard);
    }

    #[test]
    fn test_status_bar_names_route() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let screen = crate::tui::dashboard::tests::text(terminal.backend().buffer());
        assert!(screen.contains("Overview"));
        assert!(screen.contains("every 15s"));

        app.on_key(&key(KeyCode::Enter));
        terminal.draw(|f| app.render(f)).unwrap();
        let screen = crate::tui::dashboard::tests::text(terminal.backend().buffer());
        assert!(screen.contains("Detail"));
        assert!(screen.contains("every 5s"));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.on_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
