//! Drawer shell: per-drawer animation and gesture state machine.
//!
//! States: Entering → Open → Exiting → Closed (terminal).
//!
//! - Entering completes on its own (animation-finished event) and becomes Open.
//! - Open accepts drag input (sheet mode only) and close requests.
//! - Exiting plays the reverse transition and reports `ExitFinished` once.
//! - Close requests while Exiting or Closed are ignored: no restart, no
//!   second report.
//!
//! The shell owns only its own state. It never touches the stack; it emits
//! `ShellEvent`s that the controller forwards to the store.

mod animation;
mod focus;

pub use animation::{
    spring_ease, Origin, Timeline, Transform, TransitionKind, FULLSCREEN_ORIGIN_SCALE,
};
pub use focus::{FocusTarget, FocusTrap};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{AnimationConfig, GestureConfig};
use crate::domain::{AnimationState, DrawerId};
use crate::gesture::{DragRelease, DragTracker, GestureThresholds, GestureVerdict};
use crate::presentation::{Presentation, PresentationMode};

/// Something the shell needs its owner to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShellEvent {
    /// Entering finished; the drawer is at rest.
    Opened,
    /// Exit finished; the store may drop the entry now.
    ExitFinished,
    /// A snap-back settled at rest.
    SnappedBack,
}

/// Per-drawer state machine.
#[derive(Debug, Clone)]
pub struct Shell {
    id: DrawerId,
    state: AnimationState,
    presentation: Presentation,
    timeline: Option<Timeline>,
    /// Off-screen fraction when the current exit began.
    exit_from: f64,
    /// Vertical drag offset (visual px) carried by the sheet.
    drag_px: f64,
    /// Drag offset when the current snap-back or exit began.
    settle_from_px: f64,
    tracker: DragTracker,
    thresholds: GestureThresholds,
    animation: AnimationConfig,
    focus: FocusTrap,
    last_release: Option<(DragRelease, GestureVerdict)>,
}

impl Shell {
    /// Mount a shell; it starts Entering immediately.
    pub fn new(
        id: DrawerId,
        presentation: Presentation,
        animation: &AnimationConfig,
        gesture: &GestureConfig,
    ) -> Self {
        Self {
            id,
            state: AnimationState::Entering,
            presentation,
            timeline: Some(Timeline::new(TransitionKind::Enter, animation.enter_duration())),
            exit_from: 0.0,
            drag_px: 0.0,
            settle_from_px: 0.0,
            tracker: DragTracker::new(gesture),
            thresholds: GestureThresholds::from(gesture),
            animation: animation.clone(),
            focus: FocusTrap::default(),
            last_release: None,
        }
    }

    pub fn id(&self) -> DrawerId {
        self.id
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation
    }

    pub fn origin(&self) -> Origin {
        match self.presentation.mode {
            PresentationMode::BottomSheet => Origin::BottomEdge,
            PresentationMode::SidePanel => Origin::RightEdge,
            PresentationMode::Fullscreen => Origin::ScaledCenter,
        }
    }

    pub fn transition(&self) -> Option<TransitionKind> {
        self.timeline.map(|t| t.kind)
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.is_active()
    }

    pub fn drag_offset(&self) -> f64 {
        self.drag_px
    }

    pub fn last_release(&self) -> Option<(DragRelease, GestureVerdict)> {
        self.last_release
    }

    pub fn focus(&self) -> &FocusTrap {
        &self.focus
    }

    // ── Animation ──────────────────────────────────────────────────────

    /// Advance the running transition by `dt`. Emits the completion event
    /// when the transition ends inside this step.
    pub fn tick(&mut self, dt: Duration) -> Option<ShellEvent> {
        let finished = self.timeline.as_mut()?.advance(dt);
        if finished {
            self.animation_finished()
        } else {
            None
        }
    }

    /// The single "animation finished" event that drives the state machine.
    ///
    /// Hosts with their own animation engine call this directly from its
    /// completion callback instead of using `tick`.
    pub fn animation_finished(&mut self) -> Option<ShellEvent> {
        let timeline = self.timeline.take()?;
        match (self.state, timeline.kind) {
            (AnimationState::Entering, TransitionKind::Enter) => {
                self.state = AnimationState::Open;
                tracing::debug!(drawer_id = %self.id, "shell open");
                Some(ShellEvent::Opened)
            }
            (AnimationState::Exiting, TransitionKind::Exit) => {
                self.state = AnimationState::Closed;
                self.drag_px = 0.0;
                self.focus.release();
                tracing::debug!(drawer_id = %self.id, "shell closed");
                Some(ShellEvent::ExitFinished)
            }
            (AnimationState::Open, TransitionKind::SnapBack) => {
                self.drag_px = 0.0;
                Some(ShellEvent::SnappedBack)
            }
            (state, kind) => {
                tracing::warn!(drawer_id = %self.id, %state, ?kind, "stale animation completion ignored");
                None
            }
        }
    }

    /// Start the exit transition. Returns false when already exiting or closed.
    pub fn begin_exit(&mut self) -> bool {
        if !self.state.is_live() {
            return false;
        }
        self.exit_from = self.displacement();
        self.settle_from_px = self.current_drag_px();
        self.tracker.cancel();
        self.focus.release();
        self.state = AnimationState::Exiting;
        self.timeline = Some(Timeline::new(
            TransitionKind::Exit,
            self.animation.exit_duration(),
        ));
        tracing::debug!(drawer_id = %self.id, "shell exiting");
        true
    }

    /// Abort an exit and return to rest (revival of a keep-state drawer
    /// before its exit finished). Returns false unless currently exiting.
    pub fn cancel_exit(&mut self) -> bool {
        if self.state != AnimationState::Exiting {
            return false;
        }
        self.state = AnimationState::Open;
        self.timeline = None;
        self.exit_from = 0.0;
        self.drag_px = 0.0;
        self.settle_from_px = 0.0;
        tracing::debug!(drawer_id = %self.id, "shell exit cancelled");
        true
    }

    /// Off-screen fraction: 0 at rest, 1 fully off-screen.
    pub fn displacement(&self) -> f64 {
        let stiffness = self.animation.spring_stiffness;
        match (self.state, self.timeline) {
            (AnimationState::Entering, Some(t)) => 1.0 - spring_ease(t.progress(), stiffness),
            (AnimationState::Entering, None) => 1.0,
            (AnimationState::Exiting, Some(t)) => {
                let e = spring_ease(t.progress(), stiffness);
                self.exit_from + (1.0 - self.exit_from) * e
            }
            (AnimationState::Exiting, None) | (AnimationState::Closed, _) => 1.0,
            (AnimationState::Open, _) => 0.0,
        }
    }

    fn current_drag_px(&self) -> f64 {
        match (self.state, self.timeline) {
            (AnimationState::Open, Some(t)) if t.kind == TransitionKind::SnapBack => {
                self.settle_from_px * (1.0 - spring_ease(t.progress(), self.animation.spring_stiffness))
            }
            (AnimationState::Exiting, Some(t)) => {
                self.settle_from_px * (1.0 - spring_ease(t.progress(), self.animation.spring_stiffness))
            }
            (AnimationState::Exiting, None) | (AnimationState::Closed, _) => 0.0,
            _ => self.drag_px,
        }
    }

    /// Transform to draw with. `extent_px` is the panel size along its motion
    /// axis (height for sheets, width for side panels).
    pub fn transform(&self, extent_px: f64) -> Transform {
        Transform::at(self.origin(), self.displacement(), self.current_drag_px(), extent_px)
    }

    /// Backdrop opacity in [0, 1], following the drawer's presence.
    pub fn backdrop_opacity(&self) -> f64 {
        1.0 - self.displacement()
    }

    // ── Presentation ───────────────────────────────────────────────────

    /// Apply a re-resolved presentation (viewport resize). Leaving sheet mode
    /// cancels any drag in progress.
    pub fn set_presentation(&mut self, presentation: Presentation) {
        if presentation == self.presentation {
            return;
        }
        if !presentation.mode.accepts_drag() {
            self.tracker.cancel();
            self.drag_px = 0.0;
            if self.transition() == Some(TransitionKind::SnapBack) {
                self.timeline = None;
            }
        }
        self.presentation = presentation;
    }

    // ── Gestures ───────────────────────────────────────────────────────

    /// Begin a drag. Only an Open sheet accepts one; a running snap-back is
    /// settled first.
    pub fn drag_start(&mut self, timestamp_ms: u64) -> bool {
        if self.state != AnimationState::Open || !self.presentation.mode.accepts_drag() {
            return false;
        }
        if self.transition() == Some(TransitionKind::SnapBack) {
            self.timeline = None;
        }
        self.drag_px = 0.0;
        self.tracker.begin(timestamp_ms);
        true
    }

    /// Pointer moved to `offset_px` below where the drag started.
    pub fn drag_move(&mut self, offset_px: f64, timestamp_ms: u64) {
        if !self.tracker.is_active() {
            return;
        }
        self.tracker.push(offset_px, timestamp_ms);
        self.drag_px = self.tracker.visual_offset();
    }

    /// Release the drag and evaluate it. A dismiss moves straight to Exiting
    /// (the owner still has to tell the store); a snap-back stays Open and
    /// animates the offset home.
    pub fn drag_end(&mut self, timestamp_ms: u64) -> Option<GestureVerdict> {
        if !self.tracker.is_active() {
            return None;
        }
        let release = self.tracker.release(timestamp_ms);
        let verdict = self
            .thresholds
            .evaluate(release.offset_px, release.velocity_px_per_sec);
        self.last_release = Some((release, verdict));
        tracing::debug!(
            drawer_id = %self.id,
            offset_px = release.offset_px,
            velocity = release.velocity_px_per_sec,
            ?verdict,
            "drag released"
        );

        match verdict {
            GestureVerdict::Dismiss => {
                self.begin_exit();
            }
            GestureVerdict::SnapBack => {
                self.settle_from_px = self.drag_px;
                self.timeline = Some(Timeline::new(
                    TransitionKind::SnapBack,
                    self.animation.snap_back_duration(),
                ));
            }
        }
        Some(verdict)
    }

    /// Drop a drag without evaluating it (pointer cancelled, lost capture).
    pub fn drag_cancel(&mut self) {
        if !self.tracker.is_active() {
            return;
        }
        self.tracker.cancel();
        self.settle_from_px = self.drag_px;
        self.timeline = Some(Timeline::new(
            TransitionKind::SnapBack,
            self.animation.snap_back_duration(),
        ));
    }

    // ── Focus ──────────────────────────────────────────────────────────

    /// Trap focus if this shell is Open. Returns the resulting target.
    pub fn trap_focus(&mut self, focusable_count: usize) -> Option<FocusTarget> {
        if self.state != AnimationState::Open {
            return None;
        }
        self.focus.trap(focusable_count);
        self.focus.target()
    }

    pub fn release_focus(&mut self) {
        self.focus.release();
    }

    pub fn focus_next(&mut self) -> Option<FocusTarget> {
        self.focus.focus_next()
    }

    pub fn focus_prev(&mut self) -> Option<FocusTarget> {
        self.focus.focus_prev()
    }
}
