//! Drawerstack Core: overlay stack controller.
//!
//! This crate contains everything that decides which drawer is presented,
//! how it is hosted, and how it comes and goes:
//! - Domain types (ids, entries, open options, animation states)
//! - Presentation resolver (viewport width → sheet / side panel / fullscreen)
//! - Gesture evaluator and drag tracker (swipe-to-dismiss)
//! - Shell state machine (enter/exit/snap-back transitions, focus trap)
//! - Stack store (ordering, hidden pool, subscribers, audit trail)
//! - Mount (content registry, one shell per entry, z-order)
//! - Controller and per-thread session tying store and mount together
//!
//! Nothing here renders. Hosts drive frames with `DrawerController::tick` and
//! draw from `DrawerController::drawers`.

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod gesture;
pub mod mount;
pub mod presentation;
pub mod session;
pub mod shell;
pub mod store;

pub use config::DrawerConfig;
pub use controller::DrawerController;
pub use domain::{
    AnimationState, ContentType, DrawerEntry, DrawerId, OpenOptions, PresentationRequest, Props,
    SizeToken,
};
pub use error::DrawerError;
pub use gesture::{evaluate_release, GestureVerdict};
pub use mount::{ContentAction, ContentRegistry, DrawerCallbacks, DrawerContent, DrawerContentProvider};
pub use presentation::{resolve, Presentation, PresentationMode};
pub use shell::{FocusTarget, Shell, ShellEvent, Transform};
pub use store::{DrawerStore, StackSnapshot, StoreEvent};
