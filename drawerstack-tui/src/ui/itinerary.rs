//! Background layer: the itinerary and the store event log.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

/// Draw the itinerary, dimmed by the strongest drawer backdrop.
pub fn render(f: &mut Frame, area: Rect, app: &AppState, backdrop: f64) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(38)])
        .split(area);

    let base = theme::backdrop(backdrop);
    let covered = backdrop > 0.5;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if covered { base } else { theme::accent() })
        .title(" Itinerary ")
        .title_style(if covered { base } else { theme::accent_bold() });
    let inner = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    let lines: Vec<Line> = app
        .stops
        .iter()
        .enumerate()
        .map(|(i, stop)| {
            let selected = i == app.cursor;
            let marker = if selected { "▸" } else { " " };
            let place_style = if covered {
                base
            } else if selected {
                theme::accent_bold()
            } else {
                theme::text()
            };
            Line::from(vec![
                Span::styled(format!("{marker} Day {} ", stop.day), theme::muted()),
                Span::styled(format!("{:<10}", stop.place), place_style),
                Span::styled(stop.note, if covered { base } else { theme::muted() }),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);

    let log_block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Store events ");
    let log_inner = log_block.inner(chunks[1]);
    f.render_widget(log_block, chunks[1]);

    let events = app.recent_events();
    let lines: Vec<Line> = if events.is_empty() {
        vec![Line::from(Span::styled("No events yet.", theme::muted()))]
    } else {
        events
            .into_iter()
            .map(|e| Line::from(Span::styled(e, base)))
            .collect()
    };
    f.render_widget(Paragraph::new(lines), log_inner);
}
