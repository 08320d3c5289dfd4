//! Domain types for the drawer stack

pub mod audit;
pub mod entry;
pub mod ids;

pub use audit::TransitionRecord;
pub use entry::{
    AnimationState, DrawerEntry, ExitDisposition, OpenOptions, PresentationRequest, Props,
    SizeToken,
};
pub use ids::{ContentType, DrawerId, SubscriptionId};
