//! Presentation resolver: viewport width + request → hosting mode and width.
//!
//! Pure and memoryless: re-evaluated on every resize, with no dependence on
//! previous results.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PresentationConfig;
use crate::domain::{PresentationRequest, SizeToken};

/// How a drawer is visually hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationMode {
    BottomSheet,
    SidePanel,
    Fullscreen,
}

impl PresentationMode {
    pub fn label(self) -> &'static str {
        match self {
            PresentationMode::BottomSheet => "bottom-sheet",
            PresentationMode::SidePanel => "side-panel",
            PresentationMode::Fullscreen => "fullscreen",
        }
    }

    /// Only sheets accept swipe-to-dismiss.
    pub fn accepts_drag(self) -> bool {
        matches!(self, PresentationMode::BottomSheet)
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved presentation for one drawer at one viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub mode: PresentationMode,
    pub width_px: u32,
}

/// Resolve the presentation with the default breakpoint and size table.
pub fn resolve(
    viewport_width: u32,
    request: PresentationRequest,
    size: Option<SizeToken>,
) -> Presentation {
    resolve_with(&PresentationConfig::default(), viewport_width, request, size)
}

/// Resolve the presentation against an explicit configuration.
///
/// - `fullscreen` always wins, on every viewport.
/// - Below the breakpoint everything else becomes a full-width bottom sheet.
/// - Above it, a side panel sized from the token table (a size-token request
///   takes precedence over `size`), clamped to the viewport.
pub fn resolve_with(
    config: &PresentationConfig,
    viewport_width: u32,
    request: PresentationRequest,
    size: Option<SizeToken>,
) -> Presentation {
    if request == PresentationRequest::Fullscreen {
        return Presentation {
            mode: PresentationMode::Fullscreen,
            width_px: viewport_width,
        };
    }

    if viewport_width < config.breakpoint_px {
        return Presentation {
            mode: PresentationMode::BottomSheet,
            width_px: viewport_width,
        };
    }

    let token = match request {
        PresentationRequest::Size(token) => token,
        _ => size.unwrap_or(config.default_size),
    };
    let width_px = config
        .sizes
        .width_for(token)
        .map_or(viewport_width, |w| w.min(viewport_width));

    Presentation {
        mode: PresentationMode::SidePanel,
        width_px,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_viewport_gets_bottom_sheet() {
        let p = resolve(360, PresentationRequest::Auto, Some(SizeToken::Md));
        assert_eq!(p.mode, PresentationMode::BottomSheet);
        assert_eq!(p.width_px, 360);
    }

    #[test]
    fn wide_viewport_gets_side_panel_width() {
        let p = resolve(1280, PresentationRequest::Auto, Some(SizeToken::Md));
        assert_eq!(p.mode, PresentationMode::SidePanel);
        assert_eq!(p.width_px, 420);
    }

    #[test]
    fn fullscreen_wins_everywhere() {
        for width in [320, 767, 768, 1280, 2560] {
            let p = resolve(width, PresentationRequest::Fullscreen, Some(SizeToken::Sm));
            assert_eq!(p.mode, PresentationMode::Fullscreen);
            assert_eq!(p.width_px, width);
        }
    }

    #[test]
    fn size_table() {
        let cases = [
            (SizeToken::Sm, 320),
            (SizeToken::Md, 420),
            (SizeToken::Lg, 560),
            (SizeToken::Xl, 720),
            (SizeToken::Full, 1440),
        ];
        for (token, expected) in cases {
            let p = resolve(1440, PresentationRequest::Auto, Some(token));
            assert_eq!(p.width_px, expected, "token {token}");
        }
    }

    #[test]
    fn size_request_overrides_size_option() {
        let p = resolve(1280, PresentationRequest::Size(SizeToken::Xl), Some(SizeToken::Sm));
        assert_eq!(p.width_px, 720);
    }

    #[test]
    fn size_request_on_mobile_is_still_a_sheet() {
        let p = resolve(400, PresentationRequest::Size(SizeToken::Xl), None);
        assert_eq!(p.mode, PresentationMode::BottomSheet);
    }

    #[test]
    fn breakpoint_boundary() {
        assert_eq!(
            resolve(767, PresentationRequest::Auto, None).mode,
            PresentationMode::BottomSheet
        );
        assert_eq!(
            resolve(768, PresentationRequest::Auto, None).mode,
            PresentationMode::SidePanel
        );
    }

    #[test]
    fn side_panel_clamped_to_viewport() {
        let p = resolve(800, PresentationRequest::Auto, Some(SizeToken::Xl));
        assert_eq!(p.width_px, 720);
        let config = PresentationConfig {
            breakpoint_px: 300,
            ..PresentationConfig::default()
        };
        let p = resolve_with(&config, 500, PresentationRequest::Auto, Some(SizeToken::Xl));
        assert_eq!(p.width_px, 500);
    }

    #[test]
    fn missing_size_uses_configured_default() {
        let p = resolve(1280, PresentationRequest::Auto, None);
        assert_eq!(p.width_px, 420);
    }
}
