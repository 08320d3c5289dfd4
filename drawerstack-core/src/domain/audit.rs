use serde::{Deserialize, Serialize};

use super::{AnimationState, ContentType, DrawerId};

/// One recorded lifecycle transition of a drawer entry.
///
/// `from` is `None` for a fresh push. Entries leaving the stack are recorded
/// with `to = Closed`; the reason tells whether they were retained or dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub seq: u64,
    pub drawer_id: DrawerId,
    pub content_type: ContentType,
    pub from: Option<AnimationState>,
    pub to: AnimationState,
    pub reason: String,
}
