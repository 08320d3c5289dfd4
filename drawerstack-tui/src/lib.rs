//! Drawerstack TUI: a travel itinerary with drawers stacked over it.
//!
//! Hosts `drawerstack-core` in a terminal:
//! - Drawer content (trip settings, place selector, meal editor, hotel picker)
//! - Cell ↔ pixel geometry so breakpoints and swipe thresholds carry over
//! - Keyboard and mouse dispatch into the session controller
//! - Rendering of each mounted shell by presentation mode and transform

pub mod app;
pub mod content;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod navigation;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use content::{TuiContent, TuiController};
pub use theme::Theme;
