//! Terminal cells ↔ CSS pixels, and where a drawer lands on screen.
//!
//! One column is 8px and one row is 16px, so the resolver's breakpoint and
//! the gesture thresholds keep their meaning in a terminal: an 80-column
//! terminal is 640px wide (bottom sheet), a 160-column one is 1280px.

use ratatui::layout::Rect;

use drawerstack_core::{Presentation, PresentationMode, Transform};

pub const COL_PX: u32 = 8;
pub const ROW_PX: u32 = 16;

/// Share of the screen height a resting bottom sheet occupies.
pub const SHEET_HEIGHT_PERCENT: u32 = 60;
const MIN_SHEET_ROWS: u16 = 6;

/// Below this opacity a fullscreen drawer is not drawn at all.
const MIN_VISIBLE_OPACITY: f64 = 0.1;

pub fn cols_to_px(cols: u16) -> u32 {
    u32::from(cols) * COL_PX
}

pub fn rows_to_px(rows: i32) -> f64 {
    f64::from(rows) * f64::from(ROW_PX)
}

pub fn px_to_cols(px: f64) -> i32 {
    (px / f64::from(COL_PX)).round() as i32
}

pub fn px_to_rows(px: f64) -> i32 {
    (px / f64::from(ROW_PX)).round() as i32
}

/// Where the drawer sits when at rest.
pub fn rest_rect(area: Rect, presentation: Presentation) -> Rect {
    match presentation.mode {
        PresentationMode::BottomSheet => {
            let height = ((u32::from(area.height) * SHEET_HEIGHT_PERCENT / 100) as u16)
                .max(MIN_SHEET_ROWS)
                .min(area.height);
            Rect::new(area.x, area.bottom() - height, area.width, height)
        }
        PresentationMode::SidePanel => {
            let width = presentation.width_px.div_ceil(COL_PX).clamp(1, u32::from(area.width)) as u16;
            Rect::new(area.right() - width, area.y, width, area.height)
        }
        PresentationMode::Fullscreen => area,
    }
}

/// Size along the motion axis in px: sheet height or panel width.
pub fn motion_extent_px(area: Rect, presentation: Presentation) -> f64 {
    let rest = rest_rect(area, presentation);
    match presentation.mode {
        PresentationMode::BottomSheet => rows_to_px(i32::from(rest.height)),
        PresentationMode::SidePanel => f64::from(cols_to_px(rest.width)),
        PresentationMode::Fullscreen => 0.0,
    }
}

/// On-screen rect after applying the shell transform, clipped to `area`.
/// `None` when nothing of the drawer is visible.
pub fn placed_rect(area: Rect, presentation: Presentation, transform: Transform) -> Option<Rect> {
    let rest = rest_rect(area, presentation);
    let rect = match presentation.mode {
        PresentationMode::BottomSheet => {
            let y = i32::from(rest.y) + px_to_rows(transform.translate_y);
            let bottom = i32::from(area.bottom());
            if y >= bottom {
                return None;
            }
            let y = y.max(i32::from(area.y));
            Rect::new(rest.x, y as u16, rest.width, (bottom - y) as u16)
        }
        PresentationMode::SidePanel => {
            let x = i32::from(rest.x) + px_to_cols(transform.translate_x);
            let right = i32::from(area.right());
            if x >= right {
                return None;
            }
            let x = x.max(i32::from(area.x));
            Rect::new(x as u16, rest.y, (right - x) as u16, rest.height)
        }
        PresentationMode::Fullscreen => {
            if transform.opacity < MIN_VISIBLE_OPACITY {
                return None;
            }
            let width = (f64::from(area.width) * transform.scale).round() as u16;
            let height = (f64::from(area.height) * transform.scale).round() as u16;
            Rect::new(
                area.x + (area.width - width.min(area.width)) / 2,
                area.y + (area.height - height.min(area.height)) / 2,
                width.min(area.width),
                height.min(area.height),
            )
        }
    };
    (rect.width > 0 && rect.height > 0).then_some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawerstack_core::{resolve, PresentationRequest, SizeToken};

    fn screen() -> Rect {
        Rect::new(0, 0, 160, 40)
    }

    #[test]
    fn terminal_widths_map_across_breakpoint() {
        assert_eq!(cols_to_px(80), 640);
        assert_eq!(cols_to_px(160), 1280);
        let narrow = resolve(cols_to_px(80), PresentationRequest::Auto, None);
        assert_eq!(narrow.mode, PresentationMode::BottomSheet);
    }

    #[test]
    fn side_panel_rest_rect_hugs_right_edge() {
        let p = resolve(1280, PresentationRequest::Auto, Some(SizeToken::Md));
        let rect = rest_rect(screen(), p);
        assert_eq!(rect.width, 53); // 420px / 8, rounded up
        assert_eq!(rect.right(), 160);
        assert_eq!(rect.height, 40);
    }

    #[test]
    fn sheet_slides_down_with_translation() {
        let p = resolve(640, PresentationRequest::Auto, None);
        let rest = rest_rect(screen(), p);
        assert_eq!(rest.height, 24);
        assert_eq!(rest.bottom(), 40);

        let moved = placed_rect(
            screen(),
            p,
            Transform {
                translate_y: 160.0,
                ..Transform::REST
            },
        )
        .unwrap();
        assert_eq!(moved.y, rest.y + 10);
        assert_eq!(moved.bottom(), 40);
    }

    #[test]
    fn fully_translated_drawers_are_hidden() {
        let sheet = resolve(640, PresentationRequest::Auto, None);
        let extent = motion_extent_px(screen(), sheet);
        let off = Transform {
            translate_y: extent,
            ..Transform::REST
        };
        assert_eq!(placed_rect(screen(), sheet, off), None);

        let full = resolve(1280, PresentationRequest::Fullscreen, None);
        let faded = Transform {
            opacity: 0.0,
            scale: 0.92,
            ..Transform::REST
        };
        assert_eq!(placed_rect(screen(), full, faded), None);
    }

    #[test]
    fn fullscreen_scales_around_center() {
        let full = resolve(1280, PresentationRequest::Fullscreen, None);
        let rect = placed_rect(
            screen(),
            full,
            Transform {
                scale: 0.5,
                opacity: 0.8,
                ..Transform::REST
            },
        )
        .unwrap();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (40, 10, 80, 20));
    }
}
