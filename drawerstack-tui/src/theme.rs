//! Dusk theme tokens for the drawer host.
//!
//! # Color Palette
//! - **Background**: deep navy (itinerary layer)
//! - **Accent**: warm amber (focus, active drawer border)
//! - **Positive**: sea green (enabled toggles, saved)
//! - **Negative**: coral (destructive actions, missing content)
//! - **Muted**: slate (hints, inert drawers beneath the top one)

use ratatui::style::{Color, Modifier, Style};

use drawerstack_core::PresentationMode;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dusk()
    }
}

impl Theme {
    pub fn dusk() -> Self {
        Self {
            background: Color::Rgb(16, 20, 34),
            surface: Color::Rgb(28, 34, 52),
            accent: Color::Rgb(255, 183, 77),
            positive: Color::Rgb(72, 201, 176),
            negative: Color::Rgb(255, 111, 97),
            warning: Color::Rgb(255, 213, 79),
            muted: Color::Rgb(120, 134, 156),
            text_primary: Color::Rgb(236, 239, 244),
        }
    }

    /// Border color of a drawer by presentation mode; inert drawers are muted.
    pub fn drawer_border(&self, mode: PresentationMode, topmost: bool) -> Color {
        if !topmost {
            return self.muted;
        }
        match mode {
            PresentationMode::BottomSheet => self.accent,
            PresentationMode::SidePanel => self.positive,
            PresentationMode::Fullscreen => self.warning,
        }
    }
}

pub const ACCENT: Color = Color::Rgb(255, 183, 77);

pub fn accent() -> Style {
    Style::default().fg(Theme::dusk().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(Theme::dusk().muted)
}

pub fn positive() -> Style {
    Style::default().fg(Theme::dusk().positive)
}

pub fn negative() -> Style {
    Style::default().fg(Theme::dusk().negative)
}

pub fn warning() -> Style {
    Style::default().fg(Theme::dusk().warning)
}

pub fn text() -> Style {
    Style::default().fg(Theme::dusk().text_primary)
}

/// Highlight for the focused element inside the trapped drawer.
pub fn focused() -> Style {
    Style::default()
        .fg(Theme::dusk().background)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().bg(Theme::dusk().surface)
}

/// Backdrop over the itinerary while a drawer is up.
pub fn backdrop(opacity: f64) -> Style {
    if opacity > 0.5 {
        Style::default()
            .fg(Theme::dusk().muted)
            .add_modifier(Modifier::DIM)
    } else {
        text()
    }
}
