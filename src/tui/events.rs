//! Event handling for the TUI.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events that can occur in the TUI.
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal event (keyboard input).
    Key(KeyEvent),
    /// Redraw tick; picks up board changes made by the scheduler.
    Tick,
    /// Resize event.
    Resize(u16, u16),
}

/// Polls crossterm on a blocking thread and forwards events.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    _ => continue,
                }
            } else {
                Event::Tick
            };

            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }

    /// Receive the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Check if a key event matches a specific key code.
pub fn is_key(event: &KeyEvent, code: KeyCode) -> bool {
    event.code == code && event.modifiers == KeyModifiers::NONE
}

/// Check if a key event is Ctrl+C or q.
pub fn is_quit(event: &KeyEvent) -> bool {
    event.code == KeyCode::Char('c') && event.modifiers == KeyModifiers::CONTROL
        || is_key(event, KeyCode::Char('q'))
}

/// Esc or Backspace.
pub fn is_back(event: &KeyEvent) -> bool {
    is_key(event, KeyCode::Esc) || is_key(event, KeyCode::Backspace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_back_keys() {
        assert!(is_back(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_back(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE)));
        assert!(!is_back(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
