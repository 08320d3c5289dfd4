//! Drawer controller: composition root owning the store and the mount.
//!
//! Every store mutation is followed by a synchronous mount sync, so callers
//! never observe a mount that disagrees with the store. Shell completion
//! events flow back into the store here, and only here.

use std::time::Duration;

use crate::config::DrawerConfig;
use crate::domain::{ContentType, DrawerEntry, DrawerId, OpenOptions, Props, SubscriptionId};
use crate::gesture::GestureVerdict;
use crate::mount::{ContentAction, ContentRegistry, DrawerContent, DrawerMount, MountedDrawer};
use crate::shell::{FocusTarget, ShellEvent};
use crate::store::{DrawerStore, StackSnapshot, StoreEvent};

pub struct DrawerController<C: ?Sized + DrawerContent = dyn DrawerContent> {
    store: DrawerStore,
    mount: DrawerMount<C>,
    /// Drawer currently being dragged.
    dragging: Option<DrawerId>,
}

impl<C: ?Sized + DrawerContent> DrawerController<C> {
    pub fn new(config: DrawerConfig, registry: ContentRegistry<C>, viewport_width: u32) -> Self {
        Self {
            store: DrawerStore::new(&config.pool),
            mount: DrawerMount::new(config, registry, viewport_width),
            dragging: None,
        }
    }

    // ── Stack operations ───────────────────────────────────────────────

    /// Open a drawer and return the id now representing the request.
    ///
    /// When a live drawer of the same content type exists (and
    /// `allow_duplicate` is off) that drawer is reused in place: it gets the
    /// new props but is not raised, so the returned id may sit below the
    /// topmost drawer and not own focus. Compare with `topmost()` to tell.
    pub fn open(
        &mut self,
        content_type: impl Into<ContentType>,
        props: Props,
        options: OpenOptions,
    ) -> DrawerId {
        let id = self.store.open(content_type, props, options);
        self.sync();
        id
    }

    pub fn close(&mut self, id: DrawerId) -> bool {
        let changed = self.store.close(id);
        if changed {
            self.sync();
        }
        changed
    }

    pub fn back(&mut self) -> Option<DrawerId> {
        let closed = self.store.back();
        if closed.is_some() {
            self.sync();
        }
        closed
    }

    pub fn close_all(&mut self) -> usize {
        let count = self.store.close_all();
        self.sync();
        count
    }

    pub fn peek_top(&self) -> Option<&DrawerEntry> {
        self.store.peek_top()
    }

    pub fn update_props(&mut self, id: DrawerId, props: Props) -> bool {
        let changed = self.store.update_props(id, props);
        if changed {
            self.sync();
        }
        changed
    }

    pub fn evict_hidden(&mut self, content_type: &ContentType) -> bool {
        let changed = self.store.evict_hidden(content_type);
        if changed {
            self.sync();
        }
        changed
    }

    pub fn relieve_memory_pressure(&mut self) -> usize {
        let count = self.store.relieve_memory_pressure();
        if count > 0 {
            self.sync();
        }
        count
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreEvent, &StackSnapshot) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    /// Apply a request from hosted content. Returns the id of a drawer the
    /// action opened, if any.
    pub fn dispatch(&mut self, from: DrawerId, action: ContentAction) -> Option<DrawerId> {
        match action {
            ContentAction::None => None,
            ContentAction::Close => {
                self.close(from);
                None
            }
            ContentAction::Back => {
                self.back();
                None
            }
            ContentAction::Open {
                content_type,
                props,
                options,
            } => Some(self.open(content_type, props, options)),
        }
    }

    // ── Frame driving ──────────────────────────────────────────────────

    /// Advance all transitions by `dt` and feed completions to the store.
    pub fn tick(&mut self, dt: Duration) -> Vec<(DrawerId, ShellEvent)> {
        let events = self.mount.tick(dt);
        self.apply_shell_events(&events);
        events
    }

    /// Completion callback for hosts that run their own animation engine.
    pub fn animation_finished(&mut self, id: DrawerId) -> Option<ShellEvent> {
        let event = self.mount.get_mut(id)?.shell.animation_finished()?;
        self.apply_shell_events(&[(id, event)]);
        Some(event)
    }

    fn apply_shell_events(&mut self, events: &[(DrawerId, ShellEvent)]) {
        if events.is_empty() {
            return;
        }
        for &(id, event) in events {
            match event {
                ShellEvent::Opened => {
                    self.store.report_opened(id);
                }
                ShellEvent::ExitFinished => {
                    self.store.finish_exit(id);
                    if self.dragging == Some(id) {
                        self.dragging = None;
                    }
                }
                ShellEvent::SnappedBack => {}
            }
        }
        self.sync();
    }

    /// Viewport width changed; presentations are re-resolved.
    pub fn set_viewport(&mut self, width: u32) {
        self.mount.set_viewport(width);
        self.release_stale_drag();
    }

    // ── Gestures ───────────────────────────────────────────────────────

    /// Start dragging the topmost drawer. Returns its id when it accepts the
    /// drag (open bottom sheet). A drag already in progress is cancelled
    /// first; there is never more than one.
    pub fn drag_start(&mut self, timestamp_ms: u64) -> Option<DrawerId> {
        self.drag_cancel();
        let drawer = self.mount.topmost_mut()?;
        if !drawer.shell.drag_start(timestamp_ms) {
            return None;
        }
        let id = drawer.id();
        self.dragging = Some(id);
        Some(id)
    }

    pub fn drag_move(&mut self, offset_px: f64, timestamp_ms: u64) {
        if let Some(drawer) = self.dragging.and_then(|id| self.mount.get_mut(id)) {
            drawer.shell.drag_move(offset_px, timestamp_ms);
        }
    }

    /// Release the active drag. A dismiss verdict closes the drawer through
    /// the store like any other close.
    pub fn drag_end(&mut self, timestamp_ms: u64) -> Option<GestureVerdict> {
        let id = self.dragging.take()?;
        let verdict = self.mount.get_mut(id)?.shell.drag_end(timestamp_ms)?;
        if verdict == GestureVerdict::Dismiss {
            self.close(id);
        }
        Some(verdict)
    }

    pub fn drag_cancel(&mut self) {
        if let Some(drawer) = self.dragging.take().and_then(|id| self.mount.get_mut(id)) {
            drawer.shell.drag_cancel();
        }
    }

    pub fn dragging(&self) -> Option<DrawerId> {
        self.dragging
    }

    /// Only the topmost shell may be dragged. A drawer that lost that place
    /// (or its shell stopped tracking) snaps back.
    fn release_stale_drag(&mut self) {
        let Some(id) = self.dragging else {
            return;
        };
        let keep = self
            .mount
            .get(id)
            .is_some_and(|d| d.topmost && d.shell.is_dragging());
        if !keep {
            tracing::debug!(drawer_id = %id, "drag released: drawer no longer on top");
            self.drag_cancel();
        }
    }

    // ── Focus ──────────────────────────────────────────────────────────

    pub fn focus_next(&mut self) -> Option<FocusTarget> {
        self.mount.topmost_mut()?.shell.focus_next()
    }

    pub fn focus_prev(&mut self) -> Option<FocusTarget> {
        self.mount.topmost_mut()?.shell.focus_prev()
    }

    pub fn focused(&self) -> Option<(DrawerId, FocusTarget)> {
        let drawer = self.mount.topmost()?;
        drawer.shell.focus().target().map(|t| (drawer.id(), t))
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn store(&self) -> &DrawerStore {
        &self.store
    }

    pub fn mount(&self) -> &DrawerMount<C> {
        &self.mount
    }

    pub fn drawers(&self) -> impl Iterator<Item = &MountedDrawer<C>> {
        self.mount.drawers()
    }

    pub fn topmost(&self) -> Option<&MountedDrawer<C>> {
        self.mount.topmost()
    }

    pub fn content_mut(&mut self, id: DrawerId) -> Option<&mut C> {
        self.mount.get_mut(id)?.content.as_deref_mut()
    }

    pub fn snapshot(&self) -> StackSnapshot {
        self.store.snapshot()
    }

    /// No shell is mid-transition.
    pub fn is_idle(&self) -> bool {
        self.mount
            .drawers()
            .all(|d| d.shell.transition().is_none())
    }

    fn sync(&mut self) {
        self.mount.sync(&self.store);
        self.release_stale_drag();
    }
}
