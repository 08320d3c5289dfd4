use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::GestureConfig;

/// One pointer sample: vertical offset from the drag origin (positive = down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSample {
    pub offset_px: f64,
    pub timestamp_ms: u64,
}

/// A finished drag reduced to what the evaluator needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragRelease {
    pub offset_px: f64,
    pub velocity_px_per_sec: f64,
}

/// Rolling window of drag samples for one gesture.
///
/// Only the samples inside `velocity_window_ms` of the newest one (and at
/// most `max_samples` of them) are kept, so velocity reflects the motion just
/// before release rather than the whole gesture.
#[derive(Debug, Clone)]
pub struct DragTracker {
    samples: VecDeque<DragSample>,
    window_ms: u64,
    max_samples: usize,
    elasticity: f64,
    active: bool,
}

impl DragTracker {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            samples: VecDeque::with_capacity(config.max_samples),
            window_ms: config.velocity_window_ms,
            max_samples: config.max_samples.max(2),
            elasticity: config.drag_elasticity,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start a gesture at offset zero.
    pub fn begin(&mut self, timestamp_ms: u64) {
        self.samples.clear();
        self.active = true;
        self.samples.push_back(DragSample {
            offset_px: 0.0,
            timestamp_ms,
        });
    }

    /// Record a pointer move. Ignored when no gesture is active.
    pub fn push(&mut self, offset_px: f64, timestamp_ms: u64) {
        if !self.active || !offset_px.is_finite() {
            return;
        }
        // Out-of-order timestamps are pinned to the newest one seen.
        let timestamp_ms = self
            .samples
            .back()
            .map_or(timestamp_ms, |last| timestamp_ms.max(last.timestamp_ms));
        tracing::trace!(offset_px, timestamp_ms, "drag sample");
        self.samples.push_back(DragSample {
            offset_px,
            timestamp_ms,
        });
        self.prune();
    }

    /// Pointer offset from the drag origin, unconstrained.
    pub fn raw_offset(&self) -> f64 {
        self.samples.back().map_or(0.0, |s| s.offset_px)
    }

    /// Offset to draw the sheet at: never above rest, damped downward.
    pub fn visual_offset(&self) -> f64 {
        let raw = self.raw_offset();
        if raw <= 0.0 {
            0.0
        } else {
            raw * self.elasticity
        }
    }

    /// Velocity over the current window, in px/s (positive = downward).
    pub fn velocity(&self) -> f64 {
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };
        let dt_ms = last.timestamp_ms.saturating_sub(first.timestamp_ms);
        if dt_ms == 0 {
            return 0.0;
        }
        (last.offset_px - first.offset_px) / (dt_ms as f64 / 1000.0)
    }

    /// End the gesture at `timestamp_ms`. A pause before release shows up as
    /// low velocity because the window is measured up to the release time.
    pub fn release(&mut self, timestamp_ms: u64) -> DragRelease {
        if self.active {
            let offset = self.raw_offset();
            self.push(offset, timestamp_ms);
        }
        let release = DragRelease {
            offset_px: self.raw_offset(),
            velocity_px_per_sec: self.velocity(),
        };
        self.cancel();
        release
    }

    /// Drop the gesture without a verdict.
    pub fn cancel(&mut self) {
        self.samples.clear();
        self.active = false;
    }

    pub fn samples(&self) -> impl Iterator<Item = &DragSample> {
        self.samples.iter()
    }

    fn prune(&mut self) {
        let Some(newest) = self.samples.back().map(|s| s.timestamp_ms) else {
            return;
        };
        while self.samples.len() > 2 {
            let oldest = self.samples[0].timestamp_ms;
            let too_old = newest.saturating_sub(oldest) > self.window_ms;
            if too_old || self.samples.len() > self.max_samples {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        // With two samples left the older one may still be outside the
        // window; keep it only if it is the sole reference point.
        if self.samples.len() == 2 && newest.saturating_sub(self.samples[0].timestamp_ms) > self.window_ms {
            let latest = self.samples[1];
            self.samples.clear();
            self.samples.push_back(latest);
        }
    }
}
