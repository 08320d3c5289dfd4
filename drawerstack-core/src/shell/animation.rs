//! Engine-agnostic transition timing: a fixed-duration timeline with a
//! critically damped spring easing, and the transform a host applies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which transition a timeline is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    Enter,
    Exit,
    SnapBack,
}

/// A fixed-duration transition. Always completes; never waits on anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    pub kind: TransitionKind,
    elapsed: Duration,
    duration: Duration,
}

impl Timeline {
    pub fn new(kind: TransitionKind, duration: Duration) -> Self {
        Self {
            kind,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Advance by `dt`. Returns true once the timeline has reached its end.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Time left before the timeline finishes.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}

/// Critically damped spring response, rescaled so it lands exactly on 1 at `t = 1`.
pub fn spring_ease(t: f64, stiffness: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let response = |x: f64| 1.0 - (1.0 + stiffness * x) * (-stiffness * x).exp();
    let end = response(1.0);
    if end <= f64::EPSILON {
        return t;
    }
    (response(t) / end).clamp(0.0, 1.0)
}

/// Where a drawer comes from and returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    /// Slides up from below (sheets).
    BottomEdge,
    /// Slides in from the right (side panels).
    RightEdge,
    /// Grows and fades in from slightly scaled down (fullscreen).
    ScaledCenter,
}

/// Scale of a fullscreen drawer at its off-screen origin.
pub const FULLSCREEN_ORIGIN_SCALE: f64 = 0.92;

/// Visual offset of a drawer relative to its rest position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl Transform {
    pub const REST: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    /// Build a transform from the off-screen fraction (`0` at rest, `1` fully
    /// off-screen) and an extra vertical drag offset in px.
    ///
    /// `extent_px` is the panel size along its motion axis: height for sheets,
    /// width for side panels. Fullscreen ignores it.
    pub fn at(origin: Origin, displacement: f64, drag_px: f64, extent_px: f64) -> Transform {
        let d = displacement.clamp(0.0, 1.0);
        match origin {
            Origin::BottomEdge => Transform {
                translate_y: d * extent_px + drag_px.max(0.0),
                ..Transform::REST
            },
            Origin::RightEdge => Transform {
                translate_x: d * extent_px,
                ..Transform::REST
            },
            Origin::ScaledCenter => Transform {
                scale: 1.0 - (1.0 - FULLSCREEN_ORIGIN_SCALE) * d,
                opacity: 1.0 - d,
                ..Transform::REST
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_completes_after_duration() {
        let mut tl = Timeline::new(TransitionKind::Enter, Duration::from_millis(300));
        assert!(!tl.advance(Duration::from_millis(100)));
        assert!((tl.progress() - 1.0 / 3.0).abs() < 1e-9);
        assert!(tl.advance(Duration::from_millis(500)));
        assert_eq!(tl.progress(), 1.0);
        assert_eq!(tl.remaining(), Duration::ZERO);
    }

    #[test]
    fn zero_duration_is_immediately_finished() {
        let tl = Timeline::new(TransitionKind::Exit, Duration::ZERO);
        assert!(tl.is_finished());
        assert_eq!(tl.progress(), 1.0);
    }

    #[test]
    fn spring_ease_endpoints_and_monotonic() {
        assert_eq!(spring_ease(0.0, 8.0), 0.0);
        assert!((spring_ease(1.0, 8.0) - 1.0).abs() < 1e-12);
        let mut prev = 0.0;
        for i in 1..=20 {
            let v = spring_ease(i as f64 / 20.0, 8.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn spring_front_loads_motion() {
        // A spring covers most of the distance early.
        assert!(spring_ease(0.5, 8.0) > 0.8);
    }

    #[test]
    fn transform_at_origin_and_rest() {
        let off = Transform::at(Origin::BottomEdge, 1.0, 0.0, 400.0);
        assert_eq!(off.translate_y, 400.0);
        assert_eq!(Transform::at(Origin::BottomEdge, 0.0, 0.0, 400.0), Transform::REST);

        let side = Transform::at(Origin::RightEdge, 0.5, 0.0, 420.0);
        assert_eq!(side.translate_x, 210.0);

        let full = Transform::at(Origin::ScaledCenter, 1.0, 0.0, 0.0);
        assert!((full.scale - FULLSCREEN_ORIGIN_SCALE).abs() < 1e-12);
        assert_eq!(full.opacity, 0.0);
    }

    #[test]
    fn sheet_drag_offset_adds_to_translation() {
        let t = Transform::at(Origin::BottomEdge, 0.0, 35.0, 400.0);
        assert_eq!(t.translate_y, 35.0);
    }
}
