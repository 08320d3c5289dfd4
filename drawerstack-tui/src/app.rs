//! Application state: single-owner, main-thread only.
//!
//! The drawer stack itself lives in the session controller; this holds what
//! the itinerary behind the drawers needs, plus the store event log.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

use ratatui::layout::Rect;

use drawerstack_core::domain::SubscriptionId;
use drawerstack_core::{SizeToken, StoreEvent};

use crate::content::TuiController;

/// Store events kept for the side pane.
pub const EVENT_LOG_CAPACITY: usize = 12;

pub type EventLog = Rc<RefCell<VecDeque<String>>>;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// One day of the itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub day: u8,
    pub place: &'static str,
    pub note: &'static str,
}

fn sample_itinerary() -> Vec<Stop> {
    vec![
        Stop { day: 1, place: "Lisbon", note: "Arrive, tram 28 at dusk" },
        Stop { day: 2, place: "Sintra", note: "Pena palace, early train" },
        Stop { day: 3, place: "Porto", note: "Ribeira, port cellars" },
        Stop { day: 4, place: "Douro", note: "River boat, quinta lunch" },
        Stop { day: 5, place: "Madeira", note: "Levada walk" },
    ]
}

/// An in-progress mouse drag on the top sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragGesture {
    pub start_row: u16,
}

#[derive(Debug)]
pub struct AppState {
    pub running: bool,
    pub status_message: Option<(String, StatusLevel)>,
    pub stops: Vec<Stop>,
    pub cursor: usize,
    pub show_help: bool,
    /// Size token passed to drawers opened from the itinerary; `None` uses
    /// the resolver default.
    pub size: Option<SizeToken>,
    pub drag: Option<DragGesture>,
    /// Full terminal area, for hit-testing mouse events.
    pub screen: Rect,
    pub events: EventLog,
    subscription: Option<SubscriptionId>,
    started: Instant,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            running: true,
            status_message: None,
            stops: sample_itinerary(),
            cursor: 0,
            show_help: false,
            size: None,
            drag: None,
            screen: Rect::new(0, 0, 80, 24),
            events: Rc::new(RefCell::new(VecDeque::with_capacity(EVENT_LOG_CAPACITY))),
            subscription: None,
            started: Instant::now(),
        }
    }

    /// Subscribe the event log to the controller's store.
    pub fn attach(&mut self, ctl: &mut TuiController) {
        if let Some(previous) = self.subscription.take() {
            ctl.unsubscribe(previous);
        }
        let log = Rc::clone(&self.events);
        let id = ctl.subscribe(move |event, _snapshot| {
            let mut log = log.borrow_mut();
            if log.len() == EVENT_LOG_CAPACITY {
                log.pop_front();
            }
            log.push_back(describe(event));
        });
        self.subscription = Some(id);
    }

    /// Milliseconds since start; the gesture clock.
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.stops.len() {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn current_stop(&self) -> Option<&Stop> {
        self.stops.get(self.cursor)
    }

    /// Cycle default → sm → md → lg → xl → full → default.
    pub fn cycle_size(&mut self) {
        self.size = match self.size {
            None => Some(SizeToken::ALL[0]),
            Some(current) => SizeToken::ALL
                .iter()
                .position(|t| *t == current)
                .and_then(|i| SizeToken::ALL.get(i + 1))
                .copied(),
        };
    }

    pub fn recent_events(&self) -> Vec<String> {
        self.events.borrow().iter().rev().cloned().collect()
    }
}

/// One-line rendering of a store event for the log pane.
pub fn describe(event: &StoreEvent) -> String {
    match event {
        StoreEvent::Pushed { id, content_type } => format!("+ {id} {content_type}"),
        StoreEvent::Revived {
            id,
            content_type,
            in_place,
        } => {
            let how = if *in_place { "in place" } else { "from pool" };
            format!("↺ {id} {content_type} ({how})")
        }
        StoreEvent::PropsUpdated { id } => format!("~ {id} props"),
        StoreEvent::StateChanged { id, from, to } => format!("  {id} {from} → {to}"),
        StoreEvent::Removed { id, content_type } => format!("- {id} {content_type}"),
        StoreEvent::Retained { id, content_type } => format!("⇣ {id} {content_type} kept"),
        StoreEvent::Evicted { id, content_type } => format!("× {id} {content_type} evicted"),
    }
}
