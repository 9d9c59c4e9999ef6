//! Overview: one card per watched instrument.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::{Navigation, Theme};
use crate::types::{Conviction, Instrument, SymbolView};
use crate::AppState;

const COLUMNS: usize = 3;

/// Precision scaled to the price magnitude (FX needs five places, indices two).
pub(super) fn format_price(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1000.0 {
        format!("{:.2}", value)
    } else if abs >= 10.0 {
        format!("{:.3}", value)
    } else {
        format!("{:.5}", value)
    }
}

pub(super) fn format_change(pct: f64) -> String {
    let arrow = if pct >= 0.0 { "▲" } else { "▼" };
    format!("{} {:.2}%", arrow, pct.abs())
}

/// Render the overview grid.
pub fn render(frame: &mut Frame, area: Rect, app_state: &AppState, nav: &Navigation, theme: &Theme) {
    let instruments = app_state.service.instruments();
    if instruments.is_empty() {
        let empty = Paragraph::new("No instruments configured").style(theme.muted());
        frame.render_widget(empty, area);
        return;
    }

    let rows = instruments.len().div_ceil(COLUMNS);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = row * COLUMNS + col;
            let Some(instrument) = instruments.get(index) else {
                continue;
            };
            let view = app_state.service.view(&instrument.symbol);
            render_card(
                frame,
                *cell,
                instrument,
                view.as_ref(),
                index == nav.selected(),
                theme,
            );
        }
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    instrument: &Instrument,
    view: Option<&SymbolView>,
    selected: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", instrument.display_name), theme.title()))
        .border_style(if selected {
            theme.border_selected()
        } else {
            theme.border()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let report = match view {
        Some(SymbolView::Ready { report, .. }) => report,
        Some(SymbolView::Unavailable { reason, .. }) => {
            let lines = vec![
                Line::from(Span::styled(instrument.category.name(), theme.muted())),
                Line::from(""),
                Line::from(Span::styled("No signal", theme.closed())),
                Line::from(Span::styled(reason.as_str(), theme.muted())),
            ];
            frame.render_widget(Paragraph::new(lines), chunks[0]);
            return;
        }
        None => {
            let lines = vec![
                Line::from(Span::styled(instrument.category.name(), theme.muted())),
                Line::from(""),
                Line::from(Span::styled("Loading…", theme.muted())),
            ];
            frame.render_widget(Paragraph::new(lines), chunks[0]);
            return;
        }
    };

    let signal = &report.signal;
    let pct = report.features.pct_change;
    let price = Line::from(vec![
        Span::styled(format_price(report.last_bar.close), theme.title()),
        Span::raw("  "),
        Span::styled(format_change(pct), theme.change(pct)),
    ]);

    // Closed markets show price only; the signal and levels are not actionable.
    if !signal.is_live {
        let lines = vec![
            Line::from(Span::styled(instrument.category.name(), theme.muted())),
            price,
            Line::from(""),
            Line::from(Span::styled("MARKET CLOSED", theme.closed())),
            Line::from(Span::styled("Signal paused until trading resumes", theme.muted())),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
        return;
    }

    let active = signal.risk_active();
    let mut badge = vec![Span::styled(
        format!(" {} ", signal.action),
        theme.action_badge(signal.action),
    )];
    if signal.conviction == Conviction::Strong {
        badge.push(Span::styled(" STRONG", theme.header()));
    }

    let lines = vec![
        Line::from(vec![
            Span::styled(instrument.category.name(), theme.muted()),
            Span::raw("  "),
            Span::styled("● LIVE", theme.change(1.0)),
        ]),
        price,
        Line::from(badge),
        Line::from(vec![
            Span::styled("SL ", theme.muted()),
            Span::styled(
                format_price(signal.stop_loss),
                theme.level(theme.short, active),
            ),
            Span::raw("  "),
            Span::styled("TP ", theme.muted()),
            Span::styled(
                format_price(signal.take_profit),
                theme.level(theme.long, active),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(theme.score(signal.score))
        .percent(signal.score as u16)
        .label(format!("Score {}", signal.score));
    frame.render_widget(gauge, chunks[1]);
}
