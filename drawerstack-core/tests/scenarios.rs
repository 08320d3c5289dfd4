//! End-to-end drawer scenarios through the controller.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use drawerstack_core::{
    evaluate_release, resolve, AnimationState, ContentRegistry, DrawerConfig, DrawerContent,
    DrawerController, DrawerEntry, DrawerId, FocusTarget, GestureVerdict, OpenOptions,
    PresentationMode, PresentationRequest, Props, SizeToken,
};
use serde_json::json;

// ── Helpers ──────────────────────────────────────────────────────────

/// Content with a visible counter standing in for form substate.
struct Counter {
    edits: Rc<Cell<u32>>,
    props: Props,
}

impl DrawerContent for Counter {
    fn focusable_count(&self) -> usize {
        3
    }

    fn on_props(&mut self, props: &Props) {
        self.props = props.clone();
    }
}

/// Host-side content trait, the way a UI adds its own hooks.
trait Editable: DrawerContent {
    fn edit(&mut self);
    fn edits(&self) -> u32;
    fn props(&self) -> &Props;
}

impl Editable for Counter {
    fn edit(&mut self) {
        self.edits.set(self.edits.get() + 1);
    }

    fn edits(&self) -> u32 {
        self.edits.get()
    }

    fn props(&self) -> &Props {
        &self.props
    }
}

fn controller(width: u32) -> DrawerController<dyn Editable> {
    let mut registry: ContentRegistry<dyn Editable> = ContentRegistry::new();
    for tag in ["trip-settings", "place-selector", "meal-editor"] {
        registry.register(tag, |entry: &DrawerEntry| -> Box<dyn Editable> {
            Box::new(Counter {
                edits: Rc::new(Cell::new(0)),
                props: entry.props.clone(),
            })
        });
    }
    DrawerController::new(DrawerConfig::default(), registry, width)
}

fn settle(ctl: &mut DrawerController<dyn Editable>) {
    for _ in 0..10 {
        ctl.tick(Duration::from_millis(50));
    }
}

fn stack(ctl: &DrawerController<dyn Editable>) -> Vec<DrawerId> {
    ctl.store().entries().iter().map(|e| e.id).collect()
}

fn trapped(ctl: &DrawerController<dyn Editable>, id: DrawerId) -> bool {
    ctl.mount()
        .get(id)
        .is_some_and(|d| d.shell.focus().is_trapped())
}

// ── Pure policies ────────────────────────────────────────────────────

#[test]
fn gesture_evaluator_reference_points() {
    assert_eq!(evaluate_release(150.0, 0.0), GestureVerdict::Dismiss);
    assert_eq!(evaluate_release(60.0, 600.0), GestureVerdict::Dismiss);
    assert_eq!(evaluate_release(60.0, 100.0), GestureVerdict::SnapBack);
    assert_eq!(evaluate_release(0.0, 0.0), GestureVerdict::SnapBack);
}

#[test]
fn presentation_reference_points() {
    let sheet = resolve(360, PresentationRequest::Auto, Some(SizeToken::Md));
    assert_eq!(sheet.mode, PresentationMode::BottomSheet);

    let panel = resolve(1280, PresentationRequest::Auto, Some(SizeToken::Md));
    assert_eq!(panel.mode, PresentationMode::SidePanel);
    assert_eq!(panel.width_px, 420);

    for width in [320, 360, 1024, 1280] {
        let full = resolve(width, PresentationRequest::Fullscreen, None);
        assert_eq!(full.mode, PresentationMode::Fullscreen);
    }
}

// ── Stack scenarios ──────────────────────────────────────────────────

#[test]
fn open_open_back_returns_focus_to_first() {
    let mut ctl = controller(1280);
    let a = ctl.open("trip-settings", json!({}), OpenOptions::new());
    settle(&mut ctl);
    let b = ctl.open("meal-editor", json!({}), OpenOptions::new());
    settle(&mut ctl);
    assert!(trapped(&ctl, b));
    assert!(!trapped(&ctl, a));

    assert_eq!(ctl.back(), Some(b));
    // A takes the trap back as soon as B starts leaving.
    assert!(trapped(&ctl, a));
    assert!(!trapped(&ctl, b));
    assert_eq!(
        ctl.mount().get(b).map(|d| d.shell.state()),
        Some(AnimationState::Exiting)
    );

    settle(&mut ctl);
    assert_eq!(stack(&ctl), vec![a]);
    assert!(ctl.mount().get(b).is_none());
    assert_eq!(ctl.focused(), Some((a, FocusTarget::Element(0))));
}

#[test]
fn keep_state_drawer_comes_back_with_its_substate() {
    let mut ctl = controller(1280);
    let keep = OpenOptions::new().keep_state_on_close(true);

    let a = ctl.open("trip-settings", json!({"trip": 1}), keep.clone());
    settle(&mut ctl);
    ctl.content_mut(a).unwrap().edit();
    ctl.content_mut(a).unwrap().edit();

    ctl.close(a);
    settle(&mut ctl);
    assert!(ctl.store().is_empty());

    let again = ctl.open("trip-settings", json!({"trip": 2}), keep);
    assert_eq!(again, a);
    let content = ctl.content_mut(a).unwrap();
    assert_eq!(content.edits(), 2);
    assert_eq!(content.props(), &json!({"trip": 2}));
    assert_eq!(ctl.store().get(a).map(|e| e.open_count), Some(2));
}

#[test]
fn drawer_without_retention_comes_back_fresh() {
    let mut ctl = controller(1280);
    let a = ctl.open("meal-editor", json!({}), OpenOptions::new());
    settle(&mut ctl);
    ctl.content_mut(a).unwrap().edit();
    ctl.close(a);
    settle(&mut ctl);

    let b = ctl.open("meal-editor", json!({}), OpenOptions::new());
    assert_ne!(a, b);
    assert_eq!(ctl.content_mut(b).unwrap().edits(), 0);
}

#[test]
fn reopen_during_exit_reuses_entry_in_place() {
    let mut ctl = controller(1280);
    let keep = OpenOptions::new().keep_state_on_close(true);
    let a = ctl.open("trip-settings", json!({}), keep.clone());
    settle(&mut ctl);
    ctl.content_mut(a).unwrap().edit();

    ctl.close(a);
    ctl.tick(Duration::from_millis(100));
    let again = ctl.open("trip-settings", json!({"again": true}), keep);

    assert_eq!(again, a);
    assert_eq!(stack(&ctl), vec![a]);
    assert_eq!(
        ctl.store().get(a).map(|e| e.animation_state),
        Some(AnimationState::Open)
    );
    settle(&mut ctl);
    // Still there: the cancelled exit never completes.
    assert_eq!(stack(&ctl), vec![a]);
    assert_eq!(ctl.content_mut(a).unwrap().edits(), 1);
}

#[test]
fn close_all_then_close_is_noop() {
    let mut ctl = controller(1280);
    let a = ctl.open("trip-settings", json!({}), OpenOptions::new());
    let b = ctl.open("meal-editor", json!({}), OpenOptions::new());
    settle(&mut ctl);

    assert_eq!(ctl.close_all(), 2);
    assert!(!ctl.close(a));
    assert!(!ctl.close(b));
    assert_eq!(ctl.back(), None);
    assert_eq!(stack(&ctl), vec![a, b]);

    settle(&mut ctl);
    assert!(ctl.store().is_empty());
    assert!(ctl.mount().is_empty());
}

#[test]
fn nested_selectors_stack_when_duplicates_are_requested() {
    let mut ctl = controller(1280);
    let outer = ctl.open("place-selector", json!({"level": 1}), OpenOptions::new());
    let inner = ctl.open(
        "place-selector",
        json!({"level": 2}),
        OpenOptions::new().allow_duplicate(true),
    );
    settle(&mut ctl);
    assert_eq!(stack(&ctl), vec![outer, inner]);
    let z: Vec<u32> = ctl.drawers().map(|d| d.z_index).collect();
    assert!(z[0] < z[1]);
    assert!(trapped(&ctl, inner));
}

#[test]
fn unknown_content_type_is_tracked_but_empty() {
    let mut ctl = controller(1280);
    let id = ctl.open("passport-stamps", json!({}), OpenOptions::new());
    settle(&mut ctl);
    let drawer = ctl.topmost().unwrap();
    assert_eq!(drawer.id(), id);
    assert!(drawer.content_missing());
    assert_eq!(ctl.focused(), Some((id, FocusTarget::Container)));

    assert_eq!(ctl.back(), Some(id));
    settle(&mut ctl);
    assert!(ctl.store().is_empty());
}

// ── Gestures ─────────────────────────────────────────────────────────

#[test]
fn slow_drag_past_threshold_dismisses_sheet() {
    let mut ctl = controller(375);
    let id = ctl.open("meal-editor", json!({}), OpenOptions::new());
    settle(&mut ctl);

    assert_eq!(ctl.drag_start(0), Some(id));
    for step in 1..=30u64 {
        ctl.drag_move(5.0 * step as f64, step * 40);
    }
    assert_eq!(ctl.drag_end(1_300), Some(GestureVerdict::Dismiss));
    settle(&mut ctl);
    assert!(ctl.store().is_empty());
}

#[test]
fn hesitant_drag_snaps_back_and_stays() {
    let mut ctl = controller(375);
    let id = ctl.open("meal-editor", json!({}), OpenOptions::new());
    settle(&mut ctl);

    ctl.drag_start(0);
    ctl.drag_move(40.0, 300);
    ctl.drag_move(80.0, 600);
    assert_eq!(ctl.drag_end(900), Some(GestureVerdict::SnapBack));
    settle(&mut ctl);
    assert_eq!(stack(&ctl), vec![id]);
    assert_eq!(
        ctl.store().get(id).map(|e| e.animation_state),
        Some(AnimationState::Open)
    );
    assert_eq!(ctl.topmost().map(|d| d.shell.drag_offset()), Some(0.0));
}

#[test]
fn resize_mid_drag_cancels_it() {
    let mut ctl = controller(375);
    ctl.open("meal-editor", json!({}), OpenOptions::new());
    settle(&mut ctl);
    ctl.drag_start(0);
    ctl.drag_move(90.0, 20);

    ctl.set_viewport(1280);
    assert_eq!(ctl.dragging(), None);
    assert_eq!(ctl.drag_end(40), None);
    assert_eq!(ctl.store().live_entries().count(), 1);
}
