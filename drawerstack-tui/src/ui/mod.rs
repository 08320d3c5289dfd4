//! Top-level UI layout: itinerary behind, drawers on top, status bar below.

pub mod drawers;
pub mod itinerary;
pub mod overlays;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::AppState;
use crate::content::TuiController;

/// Split the screen into the drawer area and the 1-line status bar.
fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Area drawers are laid out in, for a given terminal area.
pub fn drawer_area(screen: Rect) -> Rect {
    split(screen).0
}

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState, ctl: &TuiController) {
    let (main_area, status_area) = split(f.area());

    let backdrop = ctl
        .drawers()
        .map(|d| d.shell.backdrop_opacity())
        .fold(0.0_f64, f64::max);

    itinerary::render(f, main_area, app, backdrop);
    drawers::render(f, main_area, ctl);
    status_bar::render(f, status_area, app, ctl);

    if app.show_help {
        overlays::render_help(f, main_area);
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawer_area_leaves_status_line() {
        let area = drawer_area(Rect::new(0, 0, 100, 30));
        assert_eq!(area.height, 29);
        assert_eq!(area.width, 100);
    }

    #[test]
    fn centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, outer);
        assert!(inner.x >= 20 && inner.right() <= 80);
        assert!(inner.y >= 10 && inner.bottom() <= 30);
    }
}
