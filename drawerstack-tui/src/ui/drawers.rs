//! Drawer layer: one bordered box per mounted shell, bottom of the stack
//! first, each placed by its presentation and current transform.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use drawerstack_core::mount::MountedDrawer;
use drawerstack_core::{AnimationState, FocusTarget, PresentationMode};

use crate::content::{TuiContent, TuiController};
use crate::geometry::{motion_extent_px, placed_rect};
use crate::theme::{self, Theme};

/// Fullscreen drawers fading in or out below this opacity render dimmed.
const DIM_BELOW_OPACITY: f64 = 0.6;

pub fn render(f: &mut Frame, area: Rect, ctl: &TuiController) {
    let focus = ctl.focused();
    for drawer in ctl.drawers() {
        let focus = focus
            .filter(|(id, _)| *id == drawer.id())
            .map(|(_, target)| target);
        render_drawer(f, area, drawer, focus);
    }
}

fn render_drawer(
    f: &mut Frame,
    area: Rect,
    drawer: &MountedDrawer<dyn TuiContent>,
    focus: Option<FocusTarget>,
) {
    let presentation = drawer.shell.presentation();
    let transform = drawer
        .shell
        .transform(motion_extent_px(area, presentation));
    let Some(rect) = placed_rect(area, presentation, transform) else {
        return;
    };

    let palette = Theme::dusk();
    let mut border = Style::default().fg(palette.drawer_border(presentation.mode, drawer.topmost));
    if presentation.mode == PresentationMode::Fullscreen && transform.opacity < DIM_BELOW_OPACITY {
        border = border.add_modifier(Modifier::DIM);
    }

    let title = drawer
        .title
        .clone()
        .unwrap_or_else(|| drawer.content_type.to_string());
    let state = drawer.shell.state();
    let title = if state == AnimationState::Open {
        format!(" {title} ")
    } else {
        format!(" {title} · {} ", state.label())
    };
    let hint = if drawer.callbacks.can_go_back {
        " Esc: back "
    } else {
        " Esc: close "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(theme::surface())
        .title(Span::styled(title, border.add_modifier(Modifier::BOLD)))
        .title_bottom(Line::from(Span::styled(hint, theme::muted())).right_aligned());

    f.render_widget(Clear, rect);
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    match drawer.content.as_deref() {
        Some(content) => content.render(f, inner, focus),
        None => {
            let msg = format!("Nothing can show `{}`.", drawer.content_type);
            f.render_widget(Paragraph::new(Span::styled(msg, theme::negative())), inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawerstack_core::{DrawerConfig, DrawerController, OpenOptions};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;
    use std::time::Duration;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn open_drawer_shows_title_and_missing_content() {
        let mut ctl: TuiController =
            DrawerController::new(DrawerConfig::default(), crate::content::registry(), 1280);
        ctl.open("boarding-pass", json!({}), OpenOptions::new().title("Boarding"));
        for _ in 0..10 {
            ctl.tick(Duration::from_millis(50));
        }

        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, area, &ctl);
            })
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Boarding"), "{text}");
        assert!(text.contains("Nothing can show"), "{text}");
    }

    #[test]
    fn entering_drawer_shows_state_in_title() {
        let mut ctl: TuiController =
            DrawerController::new(DrawerConfig::default(), crate::content::registry(), 640);
        ctl.open("meal-editor", json!({}), OpenOptions::new().title("Meal"));
        ctl.tick(Duration::from_millis(200));

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, area, &ctl);
            })
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Meal"), "{text}");
        assert!(text.contains("entering"), "{text}");
    }
}
