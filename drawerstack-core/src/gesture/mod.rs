//! Swipe-to-dismiss: a pure release evaluator and the drag sample tracker
//! that reduces pointer motion to a single `(offset, velocity)` pair.

mod evaluator;
mod tracker;

pub use evaluator::{evaluate_release, GestureThresholds, GestureVerdict};
pub use tracker::{DragRelease, DragSample, DragTracker};
