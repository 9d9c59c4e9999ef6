//! Detail view - one instrument with chart and indicator readout.

use chrono::DateTime;
use chrono_tz::Tz;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Sparkline},
    Frame,
};

use super::dashboard::{format_change, format_price};
use super::{Navigation, Theme};
use crate::types::{ChartPoint, Conviction, SignalReport, SymbolView};
use crate::AppState;

/// Closes rescaled to 1..=101 for the sparkline; flat windows sit mid-height.
fn sparkline_data(chart: &[ChartPoint]) -> Vec<u64> {
    let (min, max) = chart.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p.close), hi.max(p.close))
    });
    let range = max - min;

    chart
        .iter()
        .map(|p| {
            if range > 0.0 {
                ((p.close - min) / range * 100.0).round() as u64 + 1
            } else {
                50
            }
        })
        .collect()
}

fn format_time(ms: i64, tz: Tz) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|t| t.with_timezone(&tz).format("%a %d %b %H:%M %Z").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Render the focused instrument.
pub fn render(frame: &mut Frame, area: Rect, app_state: &AppState, nav: &Navigation, theme: &Theme) {
    let Some(instrument) = app_state.service.instruments().get(nav.selected()) else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ({}) ", instrument.display_name, instrument.symbol),
            theme.title(),
        ))
        .border_style(theme.border_selected());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match app_state.service.view(&instrument.symbol) {
        Some(SymbolView::Ready { report, .. }) => {
            render_report(frame, inner, &report, app_state.service.engine().display_tz(), theme)
        }
        Some(SymbolView::Unavailable { reason, .. }) => {
            let text = vec![
                Line::from(Span::styled("No signal this cycle", theme.closed())),
                Line::from(Span::styled(reason, theme.muted())),
            ];
            frame.render_widget(Paragraph::new(text), inner);
        }
        None => {
            frame.render_widget(Paragraph::new("Loading…").style(theme.muted()), inner);
        }
    }
}

fn render_report(frame: &mut Frame, area: Rect, report: &SignalReport, tz: Tz, theme: &Theme) {
    let signal = &report.signal;
    let f = &report.features;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Price header
            Constraint::Min(6),    // Chart + indicators
            Constraint::Length(4), // Signal
        ])
        .split(area);

    let status = if signal.is_live {
        Span::styled("● LIVE", theme.change(1.0))
    } else {
        Span::styled("MARKET CLOSED", theme.closed())
    };
    let change_label = if f.pct_change_full_day { "24h" } else { "window" };
    let header = vec![
        Line::from(vec![
            Span::styled(format_price(report.last_bar.close), theme.title()),
            Span::raw("  "),
            Span::styled(format_change(f.pct_change), theme.change(f.pct_change)),
            Span::styled(format!(" ({})", change_label), theme.muted()),
            Span::raw("  "),
            status,
        ]),
        Line::from(Span::styled(
            format!("Last bar {}", format_time(report.last_bar.time, tz)),
            theme.muted(),
        )),
    ];
    frame.render_widget(Paragraph::new(header), rows[0]);

    if !signal.is_live {
        let closed = Paragraph::new(vec![
            Line::from(Span::styled("MARKET CLOSED", theme.closed())),
            Line::from(Span::styled(
                "Chart, signal and levels resume with the next live bar",
                theme.muted(),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border()),
        );
        frame.render_widget(closed, rows[1].union(rows[2]));
        return;
    }

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);

    let data = sparkline_data(&report.chart);
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Close ({} bars)", report.chart.len()))
                .border_style(theme.border()),
        )
        .data(&data)
        .style(theme.change(f.pct_change));
    frame.render_widget(sparkline, middle[0]);

    let macd_style = theme.change(f.macd - f.macd_signal);
    let indicators = vec![
        Line::from(vec![
            Span::styled("RSI      ", theme.muted()),
            Span::raw(format!("{:.1}", f.rsi)),
        ]),
        Line::from(vec![
            Span::styled("MACD     ", theme.muted()),
            Span::styled(format!("{:.5}", f.macd), macd_style),
        ]),
        Line::from(vec![
            Span::styled("Signal   ", theme.muted()),
            Span::raw(format!("{:.5}", f.macd_signal)),
        ]),
        Line::from(vec![
            Span::styled("EMA 200  ", theme.muted()),
            Span::raw(format_price(f.ema_trend)),
        ]),
        Line::from(vec![
            Span::styled("Bands    ", theme.muted()),
            Span::raw(format!("{} / {}", format_price(f.band_lower), format_price(f.band_upper))),
        ]),
        Line::from(vec![
            Span::styled("ATR      ", theme.muted()),
            Span::raw(format_price(f.atr)),
        ]),
    ];
    let indicator_block = Paragraph::new(indicators).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Indicators")
            .border_style(theme.border()),
    );
    frame.render_widget(indicator_block, middle[1]);

    let signal_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(rows[2]);

    let mut action = vec![Span::styled(
        format!(" {} ", signal.action),
        theme.action_badge(signal.action),
    )];
    if signal.conviction == Conviction::Strong {
        action.push(Span::styled(" STRONG", theme.header()));
    }
    frame.render_widget(Paragraph::new(Line::from(action)), signal_rows[0]);

    let active = signal.risk_active();
    let levels = Line::from(vec![
        Span::styled("Stop loss ", theme.muted()),
        Span::styled(format_price(signal.stop_loss), theme.level(theme.short, active)),
        Span::raw("   "),
        Span::styled("Take profit ", theme.muted()),
        Span::styled(format_price(signal.take_profit), theme.level(theme.long, active)),
    ]);
    frame.render_widget(Paragraph::new(levels), signal_rows[1]);

    let gauge = Gauge::default()
        .gauge_style(theme.score(signal.score))
        .percent(signal.score as u16)
        .label(format!("Score {}", signal.score));
    frame.render_widget(gauge, signal_rows[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::dashboard::tests::{report, text};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_report_text(report: &SignalReport) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                render_report(f, f.size(), report, chrono_tz::Europe::Prague, &Theme::default())
            })
            .unwrap();
        text(terminal.backend().buffer())
    }

    #[test]
    fn test_closed_detail_replaces_chart_and_signal() {
        let screen = render_report_text(&report(false));
        assert!(screen.contains("MARKET CLOSED"));
        assert!(screen.contains("Last bar"));
        assert!(!screen.contains("Indicators"));
        assert!(!screen.contains("LONG"));
        assert!(!screen.contains("Stop loss"));
        assert!(!screen.contains("Score"));
    }

    #[test]
    fn test_live_detail_shows_chart_and_signal() {
        let screen = render_report_text(&report(true));
        assert!(screen.contains("Indicators"));
        assert!(screen.contains("LONG"));
        assert!(screen.contains("Stop loss"));
        assert!(screen.contains("Score"));
        assert!(!screen.contains("MARKET CLOSED"));
    }

    fn point(close: f64) -> ChartPoint {
        ChartPoint {
            time: 0,
            open: close,
            high: close,
            low: close,
            close,
            ema_trend: None,
            band_upper: None,
            band_lower: None,
        }
    }

    #[test]
    fn test_sparkline_scaling() {
        let data = sparkline_data(&[point(10.0), point(15.0), point(20.0)]);
        assert_eq!(data, vec![1, 51, 101]);
    }

    #[test]
    fn test_sparkline_flat_and_empty() {
        assert_eq!(sparkline_data(&[point(3.0), point(3.0)]), vec![50, 50]);
        assert!(sparkline_data(&[]).is_empty());
    }

    #[test]
    fn test_format_time_in_display_zone() {
        // 2024-03-06 12:00 UTC is 13:00 in Prague (CET)
        let ms = 1_709_726_400_000;
        assert_eq!(format_time(ms, chrono_tz::Europe::Prague), "Wed 06 Mar 13:00 CET");
    }
}
