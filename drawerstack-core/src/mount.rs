//! Drawer mount: reconciles the store's stack into one shell per entry.
//!
//! The mount is the single render point. For every stack entry in
//! `entering|open|exiting` it keeps exactly one `Shell`, keyed by id, plus the
//! content instance produced by the registered provider for the entry's
//! content type. Hidden-pool entries have no shell, but their content
//! instances are kept so a revived drawer shows its previous substate.

use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::DrawerConfig;
use crate::domain::{
    AnimationState, ContentType, DrawerEntry, DrawerId, OpenOptions, PresentationRequest, Props,
    SizeToken,
};
use crate::presentation::{resolve_with, Presentation};
use crate::shell::{Shell, ShellEvent};
use crate::store::DrawerStore;

/// Behaviour every hosted content instance offers the mount.
pub trait DrawerContent {
    /// Number of keyboard-focusable elements. Zero means focus falls back to
    /// the shell container.
    fn focusable_count(&self) -> usize {
        0
    }

    /// Props changed (duplicate open, revival, or `update_props`).
    fn on_props(&mut self, _props: &Props) {}
}

/// Creates content instances for one content type.
///
/// `C` is the host's content trait object, e.g. `dyn DrawerContent` or a
/// richer trait with rendering hooks.
pub trait DrawerContentProvider<C: ?Sized> {
    fn create(&self, entry: &DrawerEntry) -> Box<C>;
}

impl<C: ?Sized, F> DrawerContentProvider<C> for F
where
    F: Fn(&DrawerEntry) -> Box<C>,
{
    fn create(&self, entry: &DrawerEntry) -> Box<C> {
        self(entry)
    }
}

/// Capability map from content type to provider.
pub struct ContentRegistry<C: ?Sized = dyn DrawerContent> {
    providers: IndexMap<ContentType, Box<dyn DrawerContentProvider<C>>>,
}

impl<C: ?Sized> ContentRegistry<C> {
    pub fn new() -> Self {
        Self {
            providers: IndexMap::new(),
        }
    }

    /// Register (or replace) the provider for a content type.
    pub fn register(
        &mut self,
        content_type: impl Into<ContentType>,
        provider: impl DrawerContentProvider<C> + 'static,
    ) -> &mut Self {
        self.providers.insert(content_type.into(), Box::new(provider));
        self
    }

    pub fn contains(&self, content_type: &ContentType) -> bool {
        self.providers.contains_key(content_type)
    }

    pub fn content_types(&self) -> impl Iterator<Item = &ContentType> {
        self.providers.keys()
    }

    fn create(&self, entry: &DrawerEntry) -> Option<Box<C>> {
        self.providers
            .get(&entry.content_type)
            .map(|p| p.create(entry))
    }
}

impl<C: ?Sized> Default for ContentRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// What a hosted content is told about its drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawerCallbacks {
    pub id: DrawerId,
    /// A live drawer sits beneath this one, so "back" reveals it.
    pub can_go_back: bool,
}

/// Request from hosted content, applied by the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ContentAction {
    #[default]
    None,
    /// Close this drawer.
    Close,
    /// Close the top-most drawer, revealing the one beneath.
    Back,
    /// Open another drawer on top.
    Open {
        content_type: ContentType,
        #[serde(default)]
        props: Props,
        #[serde(default)]
        options: OpenOptions,
    },
}

/// One mounted drawer: its shell, content, and stacking data.
pub struct MountedDrawer<C: ?Sized> {
    pub shell: Shell,
    pub content_type: ContentType,
    pub title: Option<String>,
    pub request: PresentationRequest,
    pub size: Option<SizeToken>,
    /// `None` when no provider is registered for the content type.
    pub content: Option<Box<C>>,
    pub z_index: u32,
    pub topmost: bool,
    pub callbacks: DrawerCallbacks,
    props: Props,
}

impl<C: ?Sized> MountedDrawer<C> {
    pub fn id(&self) -> DrawerId {
        self.shell.id()
    }

    /// Nothing renders the body of this drawer.
    pub fn content_missing(&self) -> bool {
        self.content.is_none()
    }

    pub fn props(&self) -> &Props {
        &self.props
    }
}

impl<C: ?Sized> std::fmt::Debug for MountedDrawer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedDrawer")
            .field("id", &self.id())
            .field("content_type", &self.content_type)
            .field("state", &self.shell.state())
            .field("z_index", &self.z_index)
            .field("topmost", &self.topmost)
            .field("content_missing", &self.content_missing())
            .finish()
    }
}

/// Reconciles store state into mounted shells.
pub struct DrawerMount<C: ?Sized + DrawerContent = dyn DrawerContent> {
    registry: ContentRegistry<C>,
    config: DrawerConfig,
    viewport_width: u32,
    /// Mounted drawers in stack order (z order, bottom first).
    mounted: IndexMap<DrawerId, MountedDrawer<C>>,
    /// Content of entries parked in the hidden pool.
    retained: HashMap<DrawerId, Box<C>>,
}

impl<C: ?Sized + DrawerContent> DrawerMount<C> {
    pub fn new(config: DrawerConfig, registry: ContentRegistry<C>, viewport_width: u32) -> Self {
        Self {
            registry,
            config,
            viewport_width,
            mounted: IndexMap::new(),
            retained: HashMap::new(),
        }
    }

    // ── Reconciliation ─────────────────────────────────────────────────

    /// Bring the mounted shells in line with the store. Call after every
    /// store mutation; the result never depends on how many mutations
    /// happened in between.
    pub fn sync(&mut self, store: &DrawerStore) {
        let mut previous = std::mem::take(&mut self.mounted);
        let entries = store.entries();

        for entry in entries {
            let drawer = match previous.shift_remove(&entry.id) {
                Some(mut drawer) => {
                    self.reconcile(&mut drawer, entry);
                    drawer
                }
                None => self.mount_entry(entry),
            };
            self.mounted.insert(entry.id, drawer);
        }

        // Whatever is left has left the stack.
        for (id, drawer) in previous {
            match drawer.content {
                Some(content) if store.is_hidden(id) => {
                    tracing::debug!(drawer_id = %id, "unmounted, content retained");
                    self.retained.insert(id, content);
                }
                _ => tracing::debug!(drawer_id = %id, "unmounted"),
            }
        }
        self.retained.retain(|id, _| store.is_hidden(*id));

        self.restack(store);
    }

    fn mount_entry(&mut self, entry: &DrawerEntry) -> MountedDrawer<C> {
        let presentation = self.resolve(entry.presentation, entry.size);
        let mut shell = Shell::new(
            entry.id,
            presentation,
            &self.config.animation,
            &self.config.gesture,
        );
        if entry.animation_state == AnimationState::Exiting {
            shell.begin_exit();
        }

        let content = match self.retained.remove(&entry.id) {
            Some(mut content) => {
                content.on_props(&entry.props);
                Some(content)
            }
            None => self.registry.create(entry),
        };
        if content.is_none() {
            tracing::warn!(
                drawer_id = %entry.id,
                content_type = %entry.content_type,
                "no content provider registered, drawer body left empty"
            );
        }
        tracing::debug!(drawer_id = %entry.id, mode = %presentation.mode, "mounted");

        MountedDrawer {
            shell,
            content_type: entry.content_type.clone(),
            title: entry.title.clone(),
            request: entry.presentation,
            size: entry.size,
            content,
            z_index: 0,
            topmost: false,
            callbacks: DrawerCallbacks {
                id: entry.id,
                can_go_back: false,
            },
            props: entry.props.clone(),
        }
    }

    fn reconcile(&self, drawer: &mut MountedDrawer<C>, entry: &DrawerEntry) {
        match (entry.animation_state, drawer.shell.state()) {
            (AnimationState::Exiting, state) if state.is_live() => {
                drawer.shell.begin_exit();
            }
            (store_state, AnimationState::Exiting) if store_state.is_live() => {
                drawer.shell.cancel_exit();
            }
            _ => {}
        }

        if drawer.props != entry.props {
            drawer.props = entry.props.clone();
            if let Some(content) = drawer.content.as_mut() {
                content.on_props(&entry.props);
            }
        }
        drawer.title = entry.title.clone();
        if drawer.request != entry.presentation || drawer.size != entry.size {
            drawer.request = entry.presentation;
            drawer.size = entry.size;
            drawer
                .shell
                .set_presentation(self.resolve(entry.presentation, entry.size));
        }
    }

    /// Z-order, topmost flag, callbacks, and the focus trap.
    fn restack(&mut self, store: &DrawerStore) {
        let owner = store.top_live().map(|e| e.id);
        let base = self.config.mount.z_index_base;
        let step = self.config.mount.z_index_step;
        let mut live_below = 0usize;

        for (position, drawer) in self.mounted.values_mut().enumerate() {
            drawer.z_index = base.saturating_add(step.saturating_mul(position as u32));
            drawer.callbacks.can_go_back = live_below > 0;
            if drawer.shell.state().is_live() {
                live_below += 1;
            }

            drawer.topmost = Some(drawer.id()) == owner;
            if drawer.topmost && drawer.shell.state() == AnimationState::Open {
                let count = drawer.content.as_ref().map_or(0, |c| c.focusable_count());
                drawer.shell.trap_focus(count);
            } else {
                drawer.shell.release_focus();
            }
        }
    }

    // ── Frame driving ──────────────────────────────────────────────────

    /// Advance every shell's transition. Returns the completion events in
    /// z order.
    pub fn tick(&mut self, dt: Duration) -> Vec<(DrawerId, ShellEvent)> {
        self.mounted
            .values_mut()
            .filter_map(|d| d.shell.tick(dt).map(|event| (d.id(), event)))
            .collect()
    }

    /// Re-resolve every presentation for a new viewport width.
    pub fn set_viewport(&mut self, width: u32) {
        if width == self.viewport_width {
            return;
        }
        self.viewport_width = width;
        let config = &self.config.presentation;
        for drawer in self.mounted.values_mut() {
            let presentation = resolve_with(config, width, drawer.request, drawer.size);
            drawer.shell.set_presentation(presentation);
        }
        tracing::debug!(width, "viewport resized");
    }

    fn resolve(&self, request: PresentationRequest, size: Option<SizeToken>) -> Presentation {
        resolve_with(&self.config.presentation, self.viewport_width, request, size)
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn config(&self) -> &DrawerConfig {
        &self.config
    }

    pub fn registry(&self) -> &ContentRegistry<C> {
        &self.registry
    }

    /// Mounted drawers, bottom first.
    pub fn drawers(&self) -> impl Iterator<Item = &MountedDrawer<C>> {
        self.mounted.values()
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    pub fn get(&self, id: DrawerId) -> Option<&MountedDrawer<C>> {
        self.mounted.get(&id)
    }

    pub fn get_mut(&mut self, id: DrawerId) -> Option<&mut MountedDrawer<C>> {
        self.mounted.get_mut(&id)
    }

    /// The focus owner, if any.
    pub fn topmost(&self) -> Option<&MountedDrawer<C>> {
        self.mounted.values().find(|d| d.topmost)
    }

    pub fn topmost_mut(&mut self) -> Option<&mut MountedDrawer<C>> {
        self.mounted.values_mut().find(|d| d.topmost)
    }

    pub fn is_retained(&self, id: DrawerId) -> bool {
        self.retained.contains_key(&id)
    }
}
