//! Bottom status bar: viewport, stack depth, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use drawerstack_core::{resolve, PresentationRequest};

use crate::app::{AppState, StatusLevel};
use crate::content::TuiController;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, ctl: &TuiController) {
    let width = ctl.mount().viewport_width();
    let mode = resolve(width, PresentationRequest::Auto, app.size).mode;
    let size = app.size.map_or("default", |s| s.as_str());
    let store = ctl.store();

    let mut spans: Vec<Span> = vec![
        Span::styled(" ?:Help ", theme::muted()),
        Span::raw("| "),
        Span::styled(format!("{width}px → {mode} · size {size}"), theme::text()),
        Span::raw(" | "),
        Span::styled(
            format!(
                "stack {} · kept {}",
                store.entries().len(),
                store.hidden_entries().count()
            ),
            theme::text(),
        ),
    ];

    if let Some(id) = ctl.dragging() {
        let offset = ctl.mount().get(id).map_or(0.0, |d| d.shell.drag_offset());
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(format!("dragging {offset:.0}px"), theme::warning()));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
