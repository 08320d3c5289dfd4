//! Drawer controller configuration: breakpoints, durations, gesture
//! thresholds, pool sizing.
//!
//! Stored as TOML. Every section is optional; missing keys fall back to the
//! compatibility defaults, so an empty file is a valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::SizeToken;
use crate::error::DrawerError;

/// Complete controller configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawerConfig {
    pub presentation: PresentationConfig,
    pub animation: AnimationConfig,
    pub gesture: GestureConfig,
    pub pool: PoolConfig,
    pub mount: MountConfig,
}

/// Viewport breakpoint and side-panel widths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Viewports narrower than this get the bottom sheet.
    pub breakpoint_px: u32,
    /// Width used when a drawer is opened with `auto` and no size.
    pub default_size: SizeToken,
    pub sizes: SizeTable,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 768,
            default_size: SizeToken::Md,
            sizes: SizeTable::default(),
        }
    }
}

/// Pixel widths per size token. `full` is always the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeTable {
    pub sm: u32,
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
}

impl Default for SizeTable {
    fn default() -> Self {
        Self {
            sm: 320,
            md: 420,
            lg: 560,
            xl: 720,
        }
    }
}

impl SizeTable {
    /// Fixed width for a token, `None` for `full`.
    pub fn width_for(&self, token: SizeToken) -> Option<u32> {
        match token {
            SizeToken::Sm => Some(self.sm),
            SizeToken::Md => Some(self.md),
            SizeToken::Lg => Some(self.lg),
            SizeToken::Xl => Some(self.xl),
            SizeToken::Full => None,
        }
    }
}

/// Transition timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub enter_ms: u64,
    pub exit_ms: u64,
    pub snap_back_ms: u64,
    /// Stiffness of the critically damped spring easing. Higher settles faster.
    pub spring_stiffness: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enter_ms: 300,
            exit_ms: 250,
            snap_back_ms: 200,
            spring_stiffness: 8.0,
        }
    }
}

impl AnimationConfig {
    pub fn enter_duration(&self) -> Duration {
        Duration::from_millis(self.enter_ms)
    }

    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }

    pub fn snap_back_duration(&self) -> Duration {
        Duration::from_millis(self.snap_back_ms)
    }
}

/// Swipe-to-dismiss policy and drag sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// A release past this offset always dismisses.
    pub dismiss_offset_px: f64,
    /// A fast flick may dismiss from this shorter offset...
    pub flick_offset_px: f64,
    /// ...when released faster than this.
    pub flick_velocity_px_per_sec: f64,
    /// Velocity is measured over samples no older than this, relative to the newest.
    pub velocity_window_ms: u64,
    pub max_samples: usize,
    /// Fraction of downward pointer travel applied to the sheet.
    pub drag_elasticity: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            dismiss_offset_px: 100.0,
            flick_offset_px: 50.0,
            flick_velocity_px_per_sec: 500.0,
            velocity_window_ms: 100,
            max_samples: 16,
            drag_elasticity: 0.7,
        }
    }
}

/// Hidden pool sizing for keep-state-on-close entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Retained entries beyond this count evict the least recently closed one.
    pub hidden_capacity: usize,
    /// Most recent transition records kept in the audit trail.
    pub audit_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            hidden_capacity: 8,
            audit_capacity: 256,
        }
    }
}

/// Z-ordering of mounted shells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub z_index_base: u32,
    pub z_index_step: u32,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            z_index_base: 1000,
            z_index_step: 10,
        }
    }
}

impl DrawerConfig {
    /// Load a config from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self, DrawerError> {
        let content = std::fs::read_to_string(path).map_err(|source| DrawerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, DrawerError> {
        let config: DrawerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, DrawerError> {
        toml::to_string_pretty(self).map_err(|e| DrawerError::InvalidConfig(e.to_string()))
    }

    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> Result<(), DrawerError> {
        let invalid = |msg: &str| Err(DrawerError::InvalidConfig(msg.to_string()));

        if self.presentation.breakpoint_px == 0 {
            return invalid("presentation.breakpoint_px must be > 0");
        }
        let sizes = self.presentation.sizes;
        if sizes.sm == 0 || sizes.md == 0 || sizes.lg == 0 || sizes.xl == 0 {
            return invalid("presentation.sizes must all be > 0");
        }

        let g = &self.gesture;
        let thresholds = [g.dismiss_offset_px, g.flick_offset_px, g.flick_velocity_px_per_sec];
        if thresholds.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return invalid("gesture thresholds must be finite and non-negative");
        }
        if g.flick_offset_px > g.dismiss_offset_px {
            return invalid("gesture.flick_offset_px must not exceed gesture.dismiss_offset_px");
        }
        if g.max_samples < 2 {
            return invalid("gesture.max_samples must be >= 2");
        }
        if !g.drag_elasticity.is_finite() || g.drag_elasticity <= 0.0 || g.drag_elasticity > 1.0 {
            return invalid("gesture.drag_elasticity must be in (0, 1]");
        }

        let a = &self.animation;
        if !a.spring_stiffness.is_finite() || a.spring_stiffness <= 0.0 {
            return invalid("animation.spring_stiffness must be > 0");
        }

        if self.pool.hidden_capacity == 0 {
            return invalid("pool.hidden_capacity must be > 0");
        }
        if self.pool.audit_capacity == 0 {
            return invalid("pool.audit_capacity must be > 0");
        }
        if self.mount.z_index_step == 0 {
            return invalid("mount.z_index_step must be > 0");
        }
        Ok(())
    }
}
