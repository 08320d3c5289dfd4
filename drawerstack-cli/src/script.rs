//! Replay scripts: a TOML list of stack operations driven through a real
//! controller, with the stack reported after every step.
//!
//! ```toml
//! viewport = 1280
//!
//! [[content]]
//! type = "trip-settings"
//! focusables = 3
//!
//! [[step]]
//! op = "open"
//! content_type = "trip-settings"
//! props = { trip = "Azores" }
//! options = { keep_state_on_close = true }
//!
//! [[step]]
//! op = "settle"
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use drawerstack_core::{
    ContentAction, ContentRegistry, ContentType, DrawerConfig, DrawerContent, DrawerController,
    DrawerEntry, DrawerError, DrawerId, FocusTarget, OpenOptions, Props, StoreEvent,
};

/// Frame length used by `settle`.
const SETTLE_FRAME: Duration = Duration::from_millis(16);
/// `settle` gives up after this much simulated time.
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

fn default_viewport() -> u32 {
    1280
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    #[serde(default = "default_viewport")]
    pub viewport: u32,
    /// Opening a content type with no `[[content]]` entry is an error rather
    /// than an empty drawer.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub content: Vec<ContentSpec>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentSpec {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub focusables: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    Open {
        content_type: ContentType,
        #[serde(default)]
        props: Props,
        #[serde(default)]
        options: OpenOptions,
    },
    Close {
        id: u64,
    },
    Back,
    CloseAll,
    /// Advance every transition by `ms`.
    Tick {
        ms: u64,
    },
    /// Run frames until no shell is mid-transition.
    Settle,
    /// Report completion of one shell's current transition.
    Finish {
        id: u64,
    },
    Resize {
        width: u32,
    },
    /// Swipe the top sheet: one sample per offset, `interval_ms` apart, then
    /// release after `hold_ms`.
    Drag {
        offsets: Vec<f64>,
        #[serde(default = "default_interval")]
        interval_ms: u64,
        #[serde(default)]
        hold_ms: u64,
    },
    FocusNext,
    FocusPrev,
    Evict {
        content_type: ContentType,
    },
    MemoryPressure,
    UpdateProps {
        id: u64,
        props: Props,
    },
    /// Apply a content action as if drawer `from` had requested it.
    Dispatch {
        from: u64,
        request: ContentAction,
    },
}

fn default_interval() -> u64 {
    16
}

impl Step {
    pub fn label(&self) -> String {
        match self {
            Step::Open { content_type, .. } => format!("open {content_type}"),
            Step::Close { id } => format!("close {}", DrawerId(*id)),
            Step::Back => "back".into(),
            Step::CloseAll => "close-all".into(),
            Step::Tick { ms } => format!("tick {ms}ms"),
            Step::Settle => "settle".into(),
            Step::Finish { id } => format!("finish {}", DrawerId(*id)),
            Step::Resize { width } => format!("resize {width}px"),
            Step::Drag { offsets, .. } => format!("drag {} samples", offsets.len()),
            Step::FocusNext => "focus-next".into(),
            Step::FocusPrev => "focus-prev".into(),
            Step::Evict { content_type } => format!("evict {content_type}"),
            Step::MemoryPressure => "memory-pressure".into(),
            Step::UpdateProps { id, .. } => format!("update-props {}", DrawerId(*id)),
            Step::Dispatch { from, .. } => format!("dispatch from {}", DrawerId(*from)),
        }
    }
}

impl Script {
    pub fn parse(source: &str) -> Result<Self, DrawerError> {
        let script: Script = toml::from_str(source).map_err(|e| DrawerError::InvalidScript {
            step: 0,
            message: e.to_string(),
        })?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<(), DrawerError> {
        if self.viewport == 0 {
            return Err(DrawerError::InvalidScript {
                step: 0,
                message: "viewport must be > 0".into(),
            });
        }
        for (i, step) in self.steps.iter().enumerate() {
            let invalid = |message: &str| DrawerError::InvalidScript {
                step: i + 1,
                message: message.to_string(),
            };
            match step {
                Step::Drag { offsets, .. } if offsets.is_empty() => {
                    return Err(invalid("drag needs at least one offset"));
                }
                Step::Drag { offsets, .. } if offsets.iter().any(|o| !o.is_finite()) => {
                    return Err(invalid("drag offsets must be finite"));
                }
                Step::Resize { width: 0 } => return Err(invalid("width must be > 0")),
                _ => {}
            }
        }
        Ok(())
    }

    fn registry(&self) -> ContentRegistry {
        let mut registry = ContentRegistry::new();
        for spec in &self.content {
            let focusables = spec.focusables;
            registry.register(
                spec.content_type.clone(),
                move |_entry: &DrawerEntry| -> Box<dyn DrawerContent> {
                    Box::new(Scripted { focusables })
                },
            );
        }
        registry
    }
}

/// Stand-in content with a fixed number of focusable elements.
struct Scripted {
    focusables: usize,
}

impl DrawerContent for Scripted {
    fn focusable_count(&self) -> usize {
        self.focusables
    }
}

// ── Reports ──────────────────────────────────────────────────────────

/// One stack entry as shown after a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryView {
    pub id: DrawerId,
    pub content_type: ContentType,
    pub state: String,
    pub open_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_px: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<u32>,
    pub topmost: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub op: String,
    pub outcome: String,
    pub stack: Vec<EntryView>,
    pub hidden: Vec<EntryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focused: Option<(DrawerId, FocusTarget)>,
    /// Store events emitted during the step.
    pub events: Vec<StoreEvent>,
}

impl StepReport {
    pub fn render_text(&self) -> String {
        let mut out = format!("#{} {} -> {}\n", self.step, self.op, self.outcome);
        if self.stack.is_empty() {
            out.push_str("   stack: (empty)\n");
        }
        for entry in &self.stack {
            let mut line = format!("   [{} {} {}", entry.id, entry.content_type, entry.state);
            if let (Some(mode), Some(width)) = (&entry.mode, entry.width_px) {
                line.push_str(&format!(" {mode} {width}px"));
            }
            if let Some(z) = entry.z_index {
                line.push_str(&format!(" z{z}"));
            }
            if entry.topmost {
                line.push_str(" *");
            }
            line.push_str("]\n");
            out.push_str(&line);
        }
        if !self.hidden.is_empty() {
            let kept: Vec<String> = self
                .hidden
                .iter()
                .map(|e| format!("{} {}", e.id, e.content_type))
                .collect();
            out.push_str(&format!("   kept: {}\n", kept.join(", ")));
        }
        if let Some((id, target)) = self.focused {
            let target = match target {
                FocusTarget::Element(i) => format!("element {i}"),
                FocusTarget::Container => "container".to_string(),
            };
            out.push_str(&format!("   focus: {id} {target}\n"));
        }
        out
    }
}

fn view(ctl: &DrawerController, entry: &DrawerEntry) -> EntryView {
    let mounted = ctl.mount().get(entry.id);
    EntryView {
        id: entry.id,
        content_type: entry.content_type.clone(),
        state: entry.animation_state.label().to_string(),
        open_count: entry.open_count,
        mode: mounted.map(|d| d.shell.presentation().mode.label().to_string()),
        width_px: mounted.map(|d| d.shell.presentation().width_px),
        z_index: mounted.map(|d| d.z_index),
        topmost: mounted.is_some_and(|d| d.topmost),
    }
}

// ── Replay ───────────────────────────────────────────────────────────

/// Run every step and collect a report per step.
pub fn replay(script: &Script, config: DrawerConfig) -> Result<Vec<StepReport>, DrawerError> {
    let registry = script.registry();
    let mut ctl: DrawerController = DrawerController::new(config, registry, script.viewport);

    let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = std::rc::Rc::clone(&events);
    ctl.subscribe(move |event, _snapshot| sink.borrow_mut().push(event.clone()));

    // Gesture clock, advanced by ticks and drag samples.
    let mut clock_ms: u64 = 0;
    let mut reports = Vec::with_capacity(script.steps.len());

    for (i, step) in script.steps.iter().enumerate() {
        let number = i + 1;
        let span = tracing::debug_span!("step", number, op = %step.label());
        let _guard = span.enter();

        let outcome = apply(script, &mut ctl, step, number, &mut clock_ms)?;
        tracing::debug!(%outcome, "step applied");

        reports.push(StepReport {
            step: number,
            op: step.label(),
            outcome,
            stack: ctl.store().entries().iter().map(|e| view(&ctl, e)).collect(),
            hidden: ctl.store().hidden_entries().map(|e| view(&ctl, e)).collect(),
            focused: ctl.focused(),
            events: std::mem::take(&mut *events.borrow_mut()),
        });
    }
    Ok(reports)
}

fn apply(
    script: &Script,
    ctl: &mut DrawerController,
    step: &Step,
    number: usize,
    clock_ms: &mut u64,
) -> Result<String, DrawerError> {
    let changed = |yes: bool| (if yes { "ok" } else { "no-op" }).to_string();
    let outcome = match step {
        Step::Open {
            content_type,
            props,
            options,
        } => {
            if script.strict && !ctl.mount().registry().contains(content_type) {
                return Err(DrawerError::UnknownContentType(content_type.clone()));
            }
            ctl.open(content_type.clone(), props.clone(), options.clone())
                .to_string()
        }
        Step::Close { id } => changed(ctl.close(DrawerId(*id))),
        Step::Back => ctl
            .back()
            .map_or_else(|| "no-op".to_string(), |id| id.to_string()),
        Step::CloseAll => format!("{} closing", ctl.close_all()),
        Step::Tick { ms } => {
            *clock_ms += ms;
            let events = ctl.tick(Duration::from_millis(*ms));
            format!("{} transition(s) finished", events.len())
        }
        Step::Settle => {
            let mut elapsed = Duration::ZERO;
            while !ctl.is_idle() {
                if elapsed >= SETTLE_LIMIT {
                    return Err(DrawerError::InvalidScript {
                        step: number,
                        message: "transitions did not settle".into(),
                    });
                }
                ctl.tick(SETTLE_FRAME);
                elapsed += SETTLE_FRAME;
            }
            *clock_ms += elapsed.as_millis() as u64;
            format!("idle after {}ms", elapsed.as_millis())
        }
        Step::Finish { id } => ctl
            .animation_finished(DrawerId(*id))
            .map_or_else(|| "no-op".to_string(), |event| format!("{event:?}")),
        Step::Resize { width } => {
            ctl.set_viewport(*width);
            format!("{width}px")
        }
        Step::Drag {
            offsets,
            interval_ms,
            hold_ms,
        } => {
            let Some(id) = ctl.drag_start(*clock_ms) else {
                return Ok("no draggable sheet".to_string());
            };
            for offset in offsets {
                *clock_ms += interval_ms;
                ctl.drag_move(*offset, *clock_ms);
            }
            *clock_ms += hold_ms;
            match ctl.drag_end(*clock_ms) {
                Some(verdict) => format!("{id} {verdict:?}"),
                None => "drag lost".to_string(),
            }
        }
        Step::FocusNext => ctl
            .focus_next()
            .map_or_else(|| "no-op".to_string(), |t| format!("{t:?}")),
        Step::FocusPrev => ctl
            .focus_prev()
            .map_or_else(|| "no-op".to_string(), |t| format!("{t:?}")),
        Step::Evict { content_type } => changed(ctl.evict_hidden(content_type)),
        Step::MemoryPressure => format!("{} evicted", ctl.relieve_memory_pressure()),
        Step::UpdateProps { id, props } => changed(ctl.update_props(DrawerId(*id), props.clone())),
        Step::Dispatch { from, request } => ctl
            .dispatch(DrawerId(*from), request.clone())
            .map_or_else(|| "ok".to_string(), |id| format!("opened {id}")),
    };
    Ok(outcome)
}
