//! Input dispatch: help overlay → stack keys → top drawer content →
//! global keys → itinerary.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use serde_json::json;

use drawerstack_core::{DrawerId, GestureVerdict, PresentationMode};

use crate::app::{AppState, DragGesture};
use crate::content::{self, TuiController};
use crate::geometry::{rest_rect, rows_to_px};
use crate::ui;

pub fn handle_key(app: &mut AppState, ctl: &mut TuiController, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Help overlay swallows the next key.
    if app.show_help {
        app.show_help = false;
        return;
    }

    // 2. Stack keys, whatever has focus.
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Esc => {
            ctl.drag_cancel();
            app.drag = None;
            match ctl.back() {
                Some(id) => app.set_status(format!("Closing {id}")),
                None => app.set_warning("Nothing to close"),
            }
            return;
        }
        KeyCode::Tab => {
            ctl.focus_next();
            return;
        }
        KeyCode::BackTab => {
            ctl.focus_prev();
            return;
        }
        _ => {}
    }

    // 3. The top drawer's content gets first refusal.
    if let Some(id) = ctl.topmost().map(|d| d.id()) {
        let focus = ctl.focused().map(|(_, target)| target);
        let action = ctl
            .content_mut(id)
            .and_then(|content| content.handle_key(key, focus));
        if let Some(action) = action {
            if let Some(opened) = ctl.dispatch(id, action) {
                report_open(app, ctl, opened);
            }
            return;
        }
    }

    // 4. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Char('C') => {
            let n = ctl.close_all();
            app.set_status(format!("Closing {n} drawer(s)"));
            return;
        }
        KeyCode::Char('P') => {
            let n = ctl.relieve_memory_pressure();
            app.set_warning(format!("Memory pressure: dropped {n} kept drawer(s)"));
            return;
        }
        KeyCode::Char('s') => {
            open_from_itinerary(app, ctl, content::TRIP_SETTINGS);
            return;
        }
        KeyCode::Char('m') => {
            open_from_itinerary(app, ctl, content::MEAL_EDITOR);
            return;
        }
        KeyCode::Char('h') => {
            open_from_itinerary(app, ctl, content::HOTEL_PICKER);
            return;
        }
        KeyCode::Char('z') => {
            app.cycle_size();
            let label = app.size.map_or("default", |s| s.as_str());
            app.set_status(format!("Drawer size: {label}"));
            return;
        }
        _ => {}
    }

    // 5. The itinerary is inert while a drawer is up.
    if ctl.topmost().is_some() {
        return;
    }
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => open_from_itinerary(app, ctl, content::PLACE_SELECTOR),
        _ => {}
    }
}

fn open_from_itinerary(app: &mut AppState, ctl: &mut TuiController, content_type: &str) {
    let stop = app.current_stop().map(|s| s.place).unwrap_or_default();
    let props = match content_type {
        content::TRIP_SETTINGS => json!({ "trip": "Portugal, spring" }),
        content::MEAL_EDITOR => json!({ "name": format!("Dinner in {stop}") }),
        _ => json!({}),
    };
    let id = ctl.open(content_type, props, content::launch_options(content_type, app.size));
    tracing::debug!(drawer_id = %id, content_type, "opened from itinerary");
    report_open(app, ctl, id);
}

/// Status line for an open request. A reused drawer stays where it was in
/// the stack, which can be under the current top.
fn report_open(app: &mut AppState, ctl: &TuiController, id: DrawerId) {
    if ctl.topmost().is_some_and(|d| d.id() == id) {
        app.set_status(format!("Opened {id}"));
    } else {
        app.set_warning(format!("{id} is already open further down the stack"));
    }
}

/// Mouse drags on the top bottom sheet become swipe gestures.
pub fn handle_mouse(app: &mut AppState, ctl: &mut TuiController, mouse: MouseEvent, now_ms: u64) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let area = ui::drawer_area(app.screen);
            let on_sheet = ctl.topmost().is_some_and(|d| {
                let presentation = d.shell.presentation();
                presentation.mode == PresentationMode::BottomSheet
                    && mouse.row >= rest_rect(area, presentation).y
            });
            if on_sheet && ctl.drag_start(now_ms).is_some() {
                app.drag = Some(DragGesture {
                    start_row: mouse.row,
                });
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(drag) = app.drag {
                let rows = i32::from(mouse.row) - i32::from(drag.start_row);
                ctl.drag_move(rows_to_px(rows), now_ms);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.drag.take().is_none() {
                return;
            }
            match ctl.drag_end(now_ms) {
                Some(GestureVerdict::Dismiss) => app.set_status("Dismissed"),
                Some(GestureVerdict::SnapBack) => app.set_status("Snapped back"),
                None => {}
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawerstack_core::{DrawerConfig, DrawerController};

    fn controller() -> TuiController {
        DrawerController::new(DrawerConfig::default(), content::registry(), 1280)
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = AppState::new();
        let mut ctl = controller();
        let mut key = KeyEvent::from(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, &mut ctl, key);
        assert!(app.running);
    }

    #[test]
    fn help_swallows_next_key() {
        let mut app = AppState::new();
        let mut ctl = controller();
        handle_key(&mut app, &mut ctl, KeyEvent::from(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key(&mut app, &mut ctl, KeyEvent::from(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);
    }

    #[test]
    fn itinerary_is_inert_under_drawer() {
        let mut app = AppState::new();
        let mut ctl = controller();
        handle_key(&mut app, &mut ctl, KeyEvent::from(KeyCode::Char('s')));
        handle_key(&mut app, &mut ctl, KeyEvent::from(KeyCode::Char('j')));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn reopening_a_buried_drawer_says_where_it_is() {
        let mut app = AppState::new();
        let mut ctl = controller();
        handle_key(&mut app, &mut ctl, KeyEvent::from(KeyCode::Char('s')));
        let settings = ctl.topmost().map(|d| d.id()).unwrap();
        assert!(matches!(
            app.status_message,
            Some((_, crate::app::StatusLevel::Info))
        ));
        handle_key(&mut app, &mut ctl, KeyEvent::from(KeyCode::Char('h')));
        handle_key(&mut app, &mut ctl, KeyEvent::from(KeyCode::Char('s')));

        assert_ne!(ctl.topmost().map(|d| d.id()), Some(settings));
        assert_eq!(ctl.store().live_entries().count(), 2);
        let (message, level) = app.status_message.clone().unwrap();
        assert_eq!(level, crate::app::StatusLevel::Warning);
        assert!(message.contains(&settings.to_string()), "{message}");
    }

    #[test]
    fn esc_on_empty_stack_warns() {
        let mut app = AppState::new();
        let mut ctl = controller();
        handle_key(&mut app, &mut ctl, KeyEvent::from(KeyCode::Esc));
        assert!(matches!(
            app.status_message,
            Some((_, crate::app::StatusLevel::Warning))
        ));
    }
}
