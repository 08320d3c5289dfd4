//! Drawer stack store: the single source of truth for what is open and in
//! what order.
//!
//! The store manages:
//! - The ordered stack of requested drawers (most recent last)
//! - Lifecycle state of each entry (Entering → Open → Exiting → Closed)
//! - The hidden pool of retained (keep-state-on-close) entries, bounded LRU
//! - Synchronous subscriber notification after every mutation
//! - Audit trail for every state transition
//!
//! The store does NOT animate anything. Shells report completion through
//! `report_opened` and `finish_exit`; `finish_exit` is the only path by which
//! an entry leaves the stack. Every operation is idempotent: stale ids and
//! repeated closes are no-ops, never errors.

use std::collections::VecDeque;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::PoolConfig;
use crate::domain::{
    AnimationState, ContentType, DrawerEntry, DrawerId, ExitDisposition, OpenOptions, Props,
    SubscriptionId, TransitionRecord,
};

/// What changed in the store. Delivered to subscribers together with the
/// post-mutation snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum StoreEvent {
    /// A fresh entry was pushed on top.
    Pushed { id: DrawerId, content_type: ContentType },
    /// A retained entry came back. `in_place` means its exit was cancelled
    /// before it ever left the stack.
    Revived {
        id: DrawerId,
        content_type: ContentType,
        in_place: bool,
    },
    /// Props of a live entry were replaced.
    PropsUpdated { id: DrawerId },
    StateChanged {
        id: DrawerId,
        from: AnimationState,
        to: AnimationState,
    },
    /// Entry left the stack and was destroyed.
    Removed { id: DrawerId, content_type: ContentType },
    /// Entry left the stack and was parked in the hidden pool.
    Retained { id: DrawerId, content_type: ContentType },
    /// Entry was dropped from the hidden pool.
    Evicted { id: DrawerId, content_type: ContentType },
}

/// Consistent copy of the store handed to subscribers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackSnapshot {
    /// Stack entries in open order, top last.
    pub stack: Vec<DrawerEntry>,
    /// Hidden pool, least recently retained first.
    pub hidden: Vec<DrawerEntry>,
}

impl StackSnapshot {
    pub fn top(&self) -> Option<&DrawerEntry> {
        self.stack.last()
    }

    pub fn ids(&self) -> Vec<DrawerId> {
        self.stack.iter().map(|e| e.id).collect()
    }

    /// Ids of entries that are neither exiting nor closed.
    pub fn live_ids(&self) -> Vec<DrawerId> {
        self.stack
            .iter()
            .filter(|e| e.animation_state.is_live())
            .map(|e| e.id)
            .collect()
    }
}

type Listener = Box<dyn FnMut(&StoreEvent, &StackSnapshot)>;

/// The drawer stack store.
pub struct DrawerStore {
    /// Requested drawers in open-call order, top last.
    stack: Vec<DrawerEntry>,

    /// Retained entries keyed by content type, insertion order = LRU order.
    hidden: IndexMap<ContentType, DrawerEntry>,
    hidden_capacity: usize,

    next_id: u64,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, Listener)>,

    /// Most recent state transitions, oldest first.
    audit_trail: VecDeque<TransitionRecord>,
    audit_capacity: usize,
    next_seq: u64,
}

impl DrawerStore {
    pub fn new(pool: &PoolConfig) -> Self {
        Self {
            stack: Vec::new(),
            hidden: IndexMap::new(),
            hidden_capacity: pool.hidden_capacity.max(1),
            next_id: 1,
            next_subscription: 1,
            listeners: Vec::new(),
            audit_trail: VecDeque::with_capacity(pool.audit_capacity.min(1024)),
            audit_capacity: pool.audit_capacity.max(1),
            next_seq: 0,
        }
    }

    // ── Public API ─────────────────────────────────────────────────────

    /// Request a drawer. Never fails; returns the id of the entry now
    /// representing this request.
    ///
    /// Resolution order:
    /// 1. A live entry of the same content type (unless duplicates are
    ///    allowed) gets the new props and keeps its id and position. It is
    ///    not raised, so it may stay under later drawers.
    /// 2. A retained entry still exiting is revived in place: exit cancelled,
    ///    state Open, props replaced.
    /// 3. A retained entry in the hidden pool is pushed back on top, Entering.
    /// 4. Otherwise a fresh entry is pushed on top, Entering.
    ///
    /// `force_reset` skips 2 and 3 and discards the retained entry.
    pub fn open(
        &mut self,
        content_type: impl Into<ContentType>,
        props: Props,
        options: OpenOptions,
    ) -> DrawerId {
        let content_type = content_type.into();

        if !options.allow_duplicate {
            if let Some(pos) = self
                .stack
                .iter()
                .rposition(|e| e.content_type == content_type && e.animation_state.is_live())
            {
                let entry = &mut self.stack[pos];
                entry.props = props;
                if options.title.is_some() {
                    entry.title = options.title.clone();
                }
                let id = entry.id;
                tracing::debug!(drawer_id = %id, %content_type, "open reused live entry");
                self.notify(StoreEvent::PropsUpdated { id });
                return id;
            }
        }

        let exiting_retained = self.stack.iter().rposition(|e| {
            e.content_type == content_type
                && e.animation_state == AnimationState::Exiting
                && e.disposition == ExitDisposition::Retain
        });

        if options.force_reset {
            if let Some(pos) = exiting_retained {
                // Let it finish exiting, but do not park it.
                self.stack[pos].disposition = ExitDisposition::Destroy;
            }
            if let Some(old) = self.hidden.shift_remove(&content_type) {
                tracing::debug!(drawer_id = %old.id, %content_type, "retained entry reset");
                self.record(&old, Some(AnimationState::Closed), AnimationState::Closed, "reset");
                self.notify(StoreEvent::Evicted {
                    id: old.id,
                    content_type: old.content_type,
                });
            }
        } else if let Some(pos) = exiting_retained {
            let entry = &mut self.stack[pos];
            entry.revive_with(props, &options);
            entry.animation_state = AnimationState::Open;
            let snapshot = entry.clone();
            tracing::debug!(drawer_id = %snapshot.id, %content_type, "exit cancelled, revived in place");
            self.record(&snapshot, Some(AnimationState::Exiting), AnimationState::Open, "revive-in-place");
            self.notify(StoreEvent::Revived {
                id: snapshot.id,
                content_type,
                in_place: true,
            });
            return snapshot.id;
        } else if let Some(mut entry) = self.hidden.shift_remove(&content_type) {
            entry.revive_with(props, &options);
            entry.animation_state = AnimationState::Entering;
            let id = entry.id;
            tracing::debug!(drawer_id = %id, %content_type, open_count = entry.open_count, "revived from hidden pool");
            self.record(&entry, Some(AnimationState::Closed), AnimationState::Entering, "revive");
            self.stack.push(entry);
            self.notify(StoreEvent::Revived {
                id,
                content_type,
                in_place: false,
            });
            return id;
        }

        let id = DrawerId(self.next_id);
        self.next_id += 1;
        let entry = DrawerEntry::new(id, content_type.clone(), props, &options);
        tracing::debug!(drawer_id = %id, %content_type, "pushed");
        self.record(&entry, None, AnimationState::Entering, "open");
        self.stack.push(entry);
        self.notify(StoreEvent::Pushed { id, content_type });
        id
    }

    /// Start closing an entry. Returns false for stale ids and for entries
    /// already exiting.
    pub fn close(&mut self, id: DrawerId) -> bool {
        self.begin_exit(id, "close")
    }

    /// Close the top-most entry. No-op when the stack is empty or the top is
    /// already on its way out.
    pub fn back(&mut self) -> Option<DrawerId> {
        let top = self.stack.last()?;
        if !top.animation_state.is_live() {
            tracing::debug!(drawer_id = %top.id, "back ignored, top already exiting");
            return None;
        }
        let id = top.id;
        self.begin_exit(id, "back").then_some(id)
    }

    /// Close everything. The hidden pool is cleared immediately and every
    /// live entry exits with disposition Destroy. Returns how many entries
    /// started exiting.
    pub fn close_all(&mut self) -> usize {
        self.clear_hidden("close-all");

        for entry in &mut self.stack {
            entry.disposition = ExitDisposition::Destroy;
        }

        let live: Vec<DrawerId> = self
            .stack
            .iter()
            .filter(|e| e.animation_state.is_live())
            .map(|e| e.id)
            .collect();
        for &id in &live {
            self.begin_exit(id, "close-all");
        }
        live.len()
    }

    /// Current top entry, exiting or not.
    pub fn peek_top(&self) -> Option<&DrawerEntry> {
        self.stack.last()
    }

    /// Top-most entry that is not on its way out. This one owns focus.
    pub fn top_live(&self) -> Option<&DrawerEntry> {
        self.stack.iter().rev().find(|e| e.animation_state.is_live())
    }

    /// The shell finished entering.
    pub fn report_opened(&mut self, id: DrawerId) -> bool {
        self.transition(id, AnimationState::Entering, AnimationState::Open, "opened")
    }

    /// The shell finished exiting: remove the entry from the stack and either
    /// park it in the hidden pool or drop it.
    pub fn finish_exit(&mut self, id: DrawerId) -> bool {
        let Some(pos) = self
            .stack
            .iter()
            .position(|e| e.id == id && e.animation_state == AnimationState::Exiting)
        else {
            return false;
        };

        let mut entry = self.stack.remove(pos);
        entry.animation_state = AnimationState::Closed;
        let content_type = entry.content_type.clone();

        match entry.disposition {
            ExitDisposition::Retain => {
                tracing::debug!(drawer_id = %id, %content_type, "exit finished, retained");
                self.record(&entry, Some(AnimationState::Exiting), AnimationState::Closed, "retained");
                if let Some(old) = self.hidden.shift_remove(&content_type) {
                    self.evicted(old, "superseded");
                }
                self.hidden.insert(content_type.clone(), entry);
                self.notify(StoreEvent::Retained { id, content_type });
                while self.hidden.len() > self.hidden_capacity {
                    match self.hidden.shift_remove_index(0) {
                        Some((_, old)) => self.evicted(old, "capacity"),
                        None => break,
                    }
                }
            }
            ExitDisposition::Destroy => {
                tracing::debug!(drawer_id = %id, %content_type, "exit finished, destroyed");
                self.record(&entry, Some(AnimationState::Exiting), AnimationState::Closed, "removed");
                self.notify(StoreEvent::Removed { id, content_type });
            }
        }
        true
    }

    /// Drop the retained entry for a content type.
    pub fn evict_hidden(&mut self, content_type: &ContentType) -> bool {
        match self.hidden.shift_remove(content_type) {
            Some(entry) => {
                self.evicted(entry, "evict");
                true
            }
            None => false,
        }
    }

    /// Drop the whole hidden pool. Returns how many entries were evicted.
    pub fn relieve_memory_pressure(&mut self) -> usize {
        self.clear_hidden("memory-pressure")
    }

    /// Replace the props of a stack entry. Entries in the hidden pool only
    /// change on revival.
    pub fn update_props(&mut self, id: DrawerId, props: Props) -> bool {
        let Some(entry) = self.stack.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        entry.props = props;
        self.notify(StoreEvent::PropsUpdated { id });
        true
    }

    /// Look up an entry on the stack or in the hidden pool.
    pub fn get(&self, id: DrawerId) -> Option<&DrawerEntry> {
        self.stack
            .iter()
            .find(|e| e.id == id)
            .or_else(|| self.hidden.values().find(|e| e.id == id))
    }

    /// Stack entries in open order, top last.
    pub fn entries(&self) -> &[DrawerEntry] {
        &self.stack
    }

    pub fn live_entries(&self) -> impl Iterator<Item = &DrawerEntry> {
        self.stack.iter().filter(|e| e.animation_state.is_live())
    }

    /// Hidden pool, least recently retained first.
    pub fn hidden_entries(&self) -> impl Iterator<Item = &DrawerEntry> {
        self.hidden.values()
    }

    pub fn is_hidden(&self, id: DrawerId) -> bool {
        self.hidden.values().any(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            stack: self.stack.clone(),
            hidden: self.hidden.values().cloned().collect(),
        }
    }

    /// Register a listener, called synchronously after every mutation.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreEvent, &StackSnapshot) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// The most recent transitions, oldest first, bounded by
    /// `pool.audit_capacity`.
    pub fn audit_trail(&self) -> &VecDeque<TransitionRecord> {
        &self.audit_trail
    }

    /// Transitions recorded over the store's lifetime, including those that
    /// have rotated out of `audit_trail`.
    pub fn transitions_recorded(&self) -> u64 {
        self.next_seq
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn begin_exit(&mut self, id: DrawerId, reason: &str) -> bool {
        let Some(from) = self.stack.iter().find(|e| e.id == id).map(|e| e.animation_state) else {
            tracing::debug!(drawer_id = %id, reason, "close ignored, unknown id");
            return false;
        };
        if !from.is_live() {
            tracing::debug!(drawer_id = %id, reason, state = %from, "close ignored");
            return false;
        }
        self.transition(id, from, AnimationState::Exiting, reason)
    }

    fn transition(
        &mut self,
        id: DrawerId,
        from: AnimationState,
        to: AnimationState,
        reason: &str,
    ) -> bool {
        let Some(entry) = self
            .stack
            .iter_mut()
            .find(|e| e.id == id && e.animation_state == from)
        else {
            return false;
        };
        entry.animation_state = to;
        let entry = entry.clone();
        tracing::debug!(drawer_id = %id, content_type = %entry.content_type, %from, %to, reason, "state changed");
        self.record(&entry, Some(from), to, reason);
        self.notify(StoreEvent::StateChanged { id, from, to });
        true
    }

    fn clear_hidden(&mut self, reason: &str) -> usize {
        let drained: Vec<DrawerEntry> = self.hidden.drain(..).map(|(_, e)| e).collect();
        let count = drained.len();
        for entry in drained {
            self.evicted(entry, reason);
        }
        count
    }

    fn evicted(&mut self, entry: DrawerEntry, reason: &str) {
        tracing::warn!(drawer_id = %entry.id, content_type = %entry.content_type, reason, "retained drawer evicted");
        self.record(&entry, Some(AnimationState::Closed), AnimationState::Closed, reason);
        self.notify(StoreEvent::Evicted {
            id: entry.id,
            content_type: entry.content_type,
        });
    }

    fn record(
        &mut self,
        entry: &DrawerEntry,
        from: Option<AnimationState>,
        to: AnimationState,
        reason: &str,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.audit_trail.len() == self.audit_capacity {
            self.audit_trail.pop_front();
        }
        self.audit_trail.push_back(TransitionRecord {
            seq,
            drawer_id: entry.id,
            content_type: entry.content_type.clone(),
            from,
            to,
            reason: reason.to_string(),
        });
    }

    fn notify(&mut self, event: StoreEvent) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, listener) in &mut self.listeners {
            listener(&event, &snapshot);
        }
    }
}

impl Default for DrawerStore {
    fn default() -> Self {
        Self::new(&PoolConfig::default())
    }
}

impl std::fmt::Debug for DrawerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerStore")
            .field("stack", &self.stack)
            .field("hidden", &self.hidden)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
