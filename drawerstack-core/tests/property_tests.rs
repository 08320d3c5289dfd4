//! Property tests for stack invariants.
//!
//! Uses proptest to verify:
//! 1. Order preservation: the stack is always the still-present entries in
//!    the order they were first opened
//! 2. Idempotence: a second close/back has no effect of its own
//! 3. Uniqueness: at most one live entry per content type unless duplicates
//!    were requested
//! 4. Evaluator monotonicity: more offset or more velocity never turns a
//!    dismiss into a snap-back
//! 5. Resolver purity: a mounted drawer's presentation depends only on the
//!    current viewport, not on the resizes before it

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use drawerstack_core::config::PoolConfig;
use drawerstack_core::presentation::resolve;
use drawerstack_core::{
    evaluate_release, AnimationState, ContentRegistry, DrawerConfig, DrawerController,
    DrawerId, DrawerStore, GestureVerdict, OpenOptions, PresentationRequest, SizeToken,
};
use serde_json::json;

// ── Strategies (proptest) ────────────────────────────────────────────

const TYPES: [&str; 4] = ["trip-settings", "place-selector", "meal-editor", "hotel-picker"];

#[derive(Debug, Clone)]
enum Op {
    Open { ty: usize, keep: bool, dup: bool },
    Close(usize),
    Back,
    CloseAll,
    /// Shells finish whatever transition they are in.
    Complete,
    Evict,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..TYPES.len(), any::<bool>(), prop::bool::weighted(0.2))
            .prop_map(|(ty, keep, dup)| Op::Open { ty, keep, dup }),
        2 => (0..16usize).prop_map(Op::Close),
        2 => Just(Op::Back),
        1 => Just(Op::CloseAll),
        3 => Just(Op::Complete),
        1 => Just(Op::Evict),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 1..60)
}

fn arb_request() -> impl Strategy<Value = PresentationRequest> {
    prop_oneof![
        Just(PresentationRequest::Auto),
        Just(PresentationRequest::Fullscreen),
        prop::sample::select(SizeToken::ALL.to_vec()).prop_map(PresentationRequest::Size),
    ]
}

/// Pick a known id by index so closes hit both live and stale ids.
fn pick(seen: &[DrawerId], i: usize) -> DrawerId {
    if seen.is_empty() || i >= seen.len() {
        DrawerId(10_000 + i as u64)
    } else {
        seen[i]
    }
}

/// Apply one op to a bare store, completing transitions the way shells would.
fn apply(store: &mut DrawerStore, seen: &mut Vec<DrawerId>, op: &Op) {
    match *op {
        Op::Open { ty, keep, dup } => {
            let options = OpenOptions::new()
                .keep_state_on_close(keep)
                .allow_duplicate(dup);
            let id = store.open(TYPES[ty], json!({ "n": seen.len() }), options);
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        Op::Close(i) => {
            store.close(pick(seen, i));
        }
        Op::Back => {
            store.back();
        }
        Op::CloseAll => {
            store.close_all();
        }
        Op::Complete => {
            let pending: Vec<(DrawerId, AnimationState)> = store
                .entries()
                .iter()
                .map(|e| (e.id, e.animation_state))
                .collect();
            for (id, state) in pending {
                match state {
                    AnimationState::Entering => {
                        store.report_opened(id);
                    }
                    AnimationState::Exiting => {
                        store.finish_exit(id);
                    }
                    _ => {}
                }
            }
        }
        Op::Evict => {
            store.relieve_memory_pressure();
        }
    }
}

// ── 1. Order Preservation ────────────────────────────────────────────

proptest! {
    /// Stack order never disagrees with the order entries were pushed on top.
    #[test]
    fn stack_order_follows_push_order(ops in arb_ops()) {
        let mut store = DrawerStore::default();
        let mut seen = Vec::new();
        // Position at which each id was last pushed on top.
        let mut pushed_at: HashMap<DrawerId, usize> = HashMap::new();
        let mut pushes = 0usize;

        for op in &ops {
            let before: Vec<DrawerId> = store.entries().iter().map(|e| e.id).collect();
            apply(&mut store, &mut seen, op);
            for entry in store.entries() {
                if !before.contains(&entry.id) {
                    pushed_at.insert(entry.id, pushes);
                    pushes += 1;
                }
            }

            let order: Vec<usize> = store.entries().iter().map(|e| pushed_at[&e.id]).collect();
            prop_assert!(order.windows(2).all(|w| w[0] < w[1]), "order {:?}", order);
        }
    }

    /// The stack never holds an entry twice and never holds a closed entry.
    #[test]
    fn stack_entries_are_distinct_and_mounted(ops in arb_ops()) {
        let mut store = DrawerStore::default();
        let mut seen = Vec::new();
        for op in &ops {
            apply(&mut store, &mut seen, op);
            let ids: Vec<DrawerId> = store.entries().iter().map(|e| e.id).collect();
            let mut dedup = ids.clone();
            dedup.sort();
            dedup.dedup();
            prop_assert_eq!(dedup.len(), ids.len());
            prop_assert!(store.entries().iter().all(|e| e.animation_state.is_mounted()));
            for hidden in store.hidden_entries() {
                prop_assert!(!ids.contains(&hidden.id));
            }
        }
    }
}

// ── 2. Idempotence ───────────────────────────────────────────────────

proptest! {
    /// Closing the same id twice leaves the same state as closing it once.
    #[test]
    fn double_close_matches_single_close(ops in arb_ops(), target in 0..16usize) {
        let mut store = DrawerStore::default();
        let mut seen = Vec::new();
        for op in &ops {
            apply(&mut store, &mut seen, op);
        }
        let id = pick(&seen, target);
        store.close(id);
        let once = store.snapshot();
        prop_assert!(!store.close(id));
        prop_assert_eq!(store.snapshot(), once);
    }

    /// A second back() right after the first changes nothing.
    #[test]
    fn double_back_matches_single_back(ops in arb_ops()) {
        let mut store = DrawerStore::default();
        let mut seen = Vec::new();
        for op in &ops {
            apply(&mut store, &mut seen, op);
        }
        store.back();
        let once = store.snapshot();
        prop_assert_eq!(store.back(), None);
        prop_assert_eq!(store.snapshot(), once);
    }
}

// ── 3. Uniqueness ────────────────────────────────────────────────────

proptest! {
    /// Without duplicate requests, each content type has at most one live entry.
    #[test]
    fn one_live_entry_per_type_without_duplicates(ops in arb_ops()) {
        let ops: Vec<Op> = ops
            .into_iter()
            .map(|op| match op {
                Op::Open { ty, keep, .. } => Op::Open { ty, keep, dup: false },
                other => other,
            })
            .collect();
        let mut store = DrawerStore::default();
        let mut seen = Vec::new();
        for op in &ops {
            apply(&mut store, &mut seen, op);
            let mut live: HashMap<&str, usize> = HashMap::new();
            for entry in store.live_entries() {
                *live.entry(entry.content_type.as_str()).or_default() += 1;
            }
            prop_assert!(live.values().all(|&n| n == 1), "live {:?}", live);
        }
    }

    /// The hidden pool never exceeds its capacity.
    #[test]
    fn hidden_pool_is_bounded(ops in arb_ops(), capacity in 1..4usize) {
        let mut store = DrawerStore::new(&PoolConfig {
            hidden_capacity: capacity,
            ..PoolConfig::default()
        });
        let mut seen = Vec::new();
        for op in &ops {
            apply(&mut store, &mut seen, op);
            prop_assert!(store.hidden_entries().count() <= capacity);
        }
    }

    /// The controller's mount always has exactly one shell per stack entry,
    /// in stack order.
    #[test]
    fn mount_mirrors_store(ops in arb_ops()) {
        let mut ctl: DrawerController = DrawerController::new(
            DrawerConfig::default(),
            ContentRegistry::new(),
            1280,
        );
        let mut seen: Vec<DrawerId> = Vec::new();
        for op in &ops {
            match *op {
                Op::Open { ty, keep, dup } => {
                    let id = ctl.open(
                        TYPES[ty],
                        json!({}),
                        OpenOptions::new().keep_state_on_close(keep).allow_duplicate(dup),
                    );
                    seen.push(id);
                }
                Op::Close(i) => {
                    ctl.close(pick(&seen, i));
                }
                Op::Back => {
                    ctl.back();
                }
                Op::CloseAll => {
                    ctl.close_all();
                }
                Op::Complete => {
                    ctl.tick(Duration::from_millis(400));
                }
                Op::Evict => {
                    ctl.relieve_memory_pressure();
                }
            }
            let stack: Vec<DrawerId> = ctl.store().entries().iter().map(|e| e.id).collect();
            let mounted: Vec<DrawerId> = ctl.drawers().map(|d| d.id()).collect();
            prop_assert_eq!(&stack, &mounted);
            prop_assert!(ctl.drawers().filter(|d| d.topmost).count() <= 1);
            let trapped = ctl.drawers().filter(|d| d.shell.focus().is_trapped()).count();
            prop_assert!(trapped <= 1);
        }
    }
}

// ── 4. Evaluator Monotonicity ────────────────────────────────────────

proptest! {
    #[test]
    fn more_offset_never_undoes_dismiss(
        offset in -500.0..500.0_f64,
        extra in 0.0..500.0_f64,
        velocity in -5_000.0..5_000.0_f64,
    ) {
        if evaluate_release(offset, velocity) == GestureVerdict::Dismiss {
            prop_assert_eq!(evaluate_release(offset + extra, velocity), GestureVerdict::Dismiss);
            prop_assert_eq!(evaluate_release(offset, velocity + extra), GestureVerdict::Dismiss);
        }
    }

    #[test]
    fn nothing_at_or_below_flick_offset_dismisses(
        offset in -500.0..=50.0_f64,
        velocity in -10_000.0..10_000.0_f64,
    ) {
        prop_assert_eq!(evaluate_release(offset, velocity), GestureVerdict::SnapBack);
    }
}

// ── 5. Resolver Purity ───────────────────────────────────────────────

proptest! {
    #[test]
    fn resolution_ignores_history(
        widths in prop::collection::vec(200..3000u32, 1..20),
        request in arb_request(),
        size in prop::option::of(prop::sample::select(SizeToken::ALL.to_vec())),
    ) {
        let last = *widths.last().unwrap();
        let expected = resolve(last, request, size);

        // A drawer that lived through every resize ends up where a drawer
        // opened directly at the final width starts.
        let mut options = OpenOptions::new().presentation(request);
        if let Some(size) = size {
            options = options.size(size);
        }
        let mut resized: DrawerController =
            DrawerController::new(DrawerConfig::default(), ContentRegistry::new(), widths[0]);
        let id = resized.open("hotel-picker", json!({}), options.clone());
        for &w in &widths {
            resized.set_viewport(w);
        }
        let mut fresh: DrawerController =
            DrawerController::new(DrawerConfig::default(), ContentRegistry::new(), last);
        let fresh_id = fresh.open("hotel-picker", json!({}), options);

        let after_resizes = resized.mount().get(id).map(|d| d.shell.presentation());
        let opened_there = fresh.mount().get(fresh_id).map(|d| d.shell.presentation());
        prop_assert_eq!(after_resizes, Some(expected));
        prop_assert_eq!(opened_there, Some(expected));
        prop_assert!(expected.width_px <= last);
    }
}
