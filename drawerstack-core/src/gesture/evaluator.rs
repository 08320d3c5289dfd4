use serde::{Deserialize, Serialize};

use crate::config::GestureConfig;

/// Outcome of releasing a sheet drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureVerdict {
    Dismiss,
    SnapBack,
}

/// Two-tier dismissal policy: a long drag, or a shorter fast flick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureThresholds {
    pub dismiss_offset_px: f64,
    pub flick_offset_px: f64,
    pub flick_velocity_px_per_sec: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self::from(&GestureConfig::default())
    }
}

impl From<&GestureConfig> for GestureThresholds {
    fn from(config: &GestureConfig) -> Self {
        Self {
            dismiss_offset_px: config.dismiss_offset_px,
            flick_offset_px: config.flick_offset_px,
            flick_velocity_px_per_sec: config.flick_velocity_px_per_sec,
        }
    }
}

impl GestureThresholds {
    /// Both comparisons are strict: exactly 100px (or 50px at exactly
    /// 500px/s) snaps back.
    pub fn evaluate(&self, offset_px: f64, velocity_px_per_sec: f64) -> GestureVerdict {
        if offset_px > self.dismiss_offset_px {
            return GestureVerdict::Dismiss;
        }
        if offset_px > self.flick_offset_px && velocity_px_per_sec > self.flick_velocity_px_per_sec {
            return GestureVerdict::Dismiss;
        }
        GestureVerdict::SnapBack
    }
}

/// Evaluate a release with the compatibility thresholds (100px, or 50px above 500px/s).
pub fn evaluate_release(offset_px: f64, velocity_px_per_sec: f64) -> GestureVerdict {
    GestureThresholds::default().evaluate(offset_px, velocity_px_per_sec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_slow_drag_dismisses() {
        assert_eq!(evaluate_release(150.0, 0.0), GestureVerdict::Dismiss);
    }

    #[test]
    fn short_fast_flick_dismisses() {
        assert_eq!(evaluate_release(60.0, 600.0), GestureVerdict::Dismiss);
    }

    #[test]
    fn short_slow_drag_snaps_back() {
        assert_eq!(evaluate_release(60.0, 100.0), GestureVerdict::SnapBack);
    }

    #[test]
    fn no_movement_snaps_back() {
        assert_eq!(evaluate_release(0.0, 0.0), GestureVerdict::SnapBack);
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(evaluate_release(100.0, 0.0), GestureVerdict::SnapBack);
        assert_eq!(evaluate_release(50.0, 10_000.0), GestureVerdict::SnapBack);
        assert_eq!(evaluate_release(75.0, 500.0), GestureVerdict::SnapBack);
    }

    #[test]
    fn fast_flick_below_lower_threshold_snaps_back() {
        assert_eq!(evaluate_release(30.0, 2_000.0), GestureVerdict::SnapBack);
    }

    #[test]
    fn upward_flick_never_dismisses() {
        assert_eq!(evaluate_release(-200.0, -3_000.0), GestureVerdict::SnapBack);
    }

    #[test]
    fn custom_thresholds() {
        let t = GestureThresholds {
            dismiss_offset_px: 200.0,
            flick_offset_px: 20.0,
            flick_velocity_px_per_sec: 100.0,
        };
        assert_eq!(t.evaluate(150.0, 0.0), GestureVerdict::SnapBack);
        assert_eq!(t.evaluate(25.0, 150.0), GestureVerdict::Dismiss);
    }
}
