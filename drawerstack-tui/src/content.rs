//! Drawer bodies hosted by the terminal app.
//!
//! Each content type the itinerary can open has a provider here. Content
//! renders itself into the area its shell hands it and turns key presses
//! into `ContentAction`s; it never touches the stack directly.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use drawerstack_core::{
    ContentAction, ContentRegistry, DrawerContent, DrawerController, DrawerEntry, FocusTarget,
    OpenOptions, PresentationRequest, Props, SizeToken,
};

use crate::theme;

pub const TRIP_SETTINGS: &str = "trip-settings";
pub const PLACE_SELECTOR: &str = "place-selector";
pub const MEAL_EDITOR: &str = "meal-editor";
pub const HOTEL_PICKER: &str = "hotel-picker";

/// Deepest nested place selector; selecting at this level goes back instead.
pub const MAX_PLACE_DEPTH: u8 = 2;

/// Content as the terminal host sees it.
pub trait TuiContent: DrawerContent {
    fn render(&self, f: &mut Frame, area: Rect, focus: Option<FocusTarget>);

    /// `None` when the key means nothing to this content and should fall
    /// through to the app's global bindings.
    fn handle_key(&mut self, key: KeyEvent, focus: Option<FocusTarget>) -> Option<ContentAction>;
}

pub type TuiController = DrawerController<dyn TuiContent>;

/// Registry with every content type the itinerary opens.
pub fn registry() -> ContentRegistry<dyn TuiContent> {
    let mut registry: ContentRegistry<dyn TuiContent> = ContentRegistry::new();
    registry
        .register(TRIP_SETTINGS, |entry: &DrawerEntry| -> Box<dyn TuiContent> {
            Box::new(TripSettings::from_props(&entry.props))
        })
        .register(PLACE_SELECTOR, |entry: &DrawerEntry| -> Box<dyn TuiContent> {
            Box::new(PlaceSelector::from_props(&entry.props))
        })
        .register(MEAL_EDITOR, |entry: &DrawerEntry| -> Box<dyn TuiContent> {
            Box::new(MealEditor::from_props(&entry.props))
        })
        .register(HOTEL_PICKER, |entry: &DrawerEntry| -> Box<dyn TuiContent> {
            Box::new(HotelPicker::from_props(&entry.props))
        });
    registry
}

/// Open options each content type is launched with from the itinerary.
pub fn launch_options(content_type: &str, size: Option<SizeToken>) -> OpenOptions {
    let options = match content_type {
        TRIP_SETTINGS => OpenOptions::new()
            .title("Trip settings")
            .keep_state_on_close(true),
        PLACE_SELECTOR => OpenOptions::new().title("Choose a place"),
        MEAL_EDITOR => OpenOptions::new().title("Meal"),
        HOTEL_PICKER => OpenOptions::new()
            .title("Hotels")
            .presentation(PresentationRequest::Fullscreen),
        _ => OpenOptions::new(),
    };
    match size {
        Some(size) => options.size(size),
        None => options,
    }
}

fn is_focused(focus: Option<FocusTarget>, index: usize) -> bool {
    focus == Some(FocusTarget::Element(index))
}

fn activates(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}

fn parse<T: DeserializeOwned + Default>(props: &Props) -> T {
    match serde_json::from_value(props.clone()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed drawer props");
            T::default()
        }
    }
}

// ── Trip settings ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TripProps {
    trip: Option<String>,
}

/// Toggles plus a Done button. Opened with keep-state-on-close, so the
/// toggles survive closing and reopening.
#[derive(Debug)]
pub struct TripSettings {
    pub trip: String,
    pub toggles: [(&'static str, bool); 3],
}

impl TripSettings {
    fn from_props(props: &Props) -> Self {
        let parsed: TripProps = parse(props);
        Self {
            trip: parsed.trip.unwrap_or_else(|| "Untitled trip".into()),
            toggles: [
                ("Price drop alerts", false),
                ("Share itinerary", false),
                ("Offline maps", true),
            ],
        }
    }

    fn done_index(&self) -> usize {
        self.toggles.len()
    }
}

impl DrawerContent for TripSettings {
    fn focusable_count(&self) -> usize {
        self.toggles.len() + 1
    }

    fn on_props(&mut self, props: &Props) {
        if let Some(trip) = parse::<TripProps>(props).trip {
            self.trip = trip;
        }
    }
}

impl TuiContent for TripSettings {
    fn render(&self, f: &mut Frame, area: Rect, focus: Option<FocusTarget>) {
        let mut lines = vec![
            Line::from(Span::styled(self.trip.as_str(), theme::accent_bold())),
            Line::from(""),
        ];
        for (i, (label, on)) in self.toggles.iter().enumerate() {
            let mark = if *on { "[x]" } else { "[ ]" };
            let style = if is_focused(focus, i) {
                theme::focused()
            } else if *on {
                theme::positive()
            } else {
                theme::text()
            };
            lines.push(Line::from(Span::styled(format!(" {mark} {label} "), style)));
        }
        lines.push(Line::from(""));
        let done_style = if is_focused(focus, self.done_index()) {
            theme::focused()
        } else {
            theme::accent()
        };
        lines.push(Line::from(Span::styled(" Done ", done_style)));
        f.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, focus: Option<FocusTarget>) -> Option<ContentAction> {
        if !activates(&key) {
            return None;
        }
        match focus {
            Some(FocusTarget::Element(i)) if i < self.toggles.len() => {
                self.toggles[i].1 = !self.toggles[i].1;
                Some(ContentAction::None)
            }
            Some(FocusTarget::Element(_)) => Some(ContentAction::Close),
            _ => None,
        }
    }
}

// ── Place selector ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlaceProps {
    level: u8,
    parent: Option<String>,
    places: Vec<String>,
}

/// A list of places. Choosing one opens a nested selector for its
/// neighbourhoods until the maximum depth.
#[derive(Debug)]
pub struct PlaceSelector {
    pub level: u8,
    pub parent: Option<String>,
    pub places: Vec<String>,
}

impl PlaceSelector {
    fn from_props(props: &Props) -> Self {
        let parsed: PlaceProps = parse(props);
        let places = if parsed.places.is_empty() {
            default_places(parsed.parent.as_deref())
        } else {
            parsed.places
        };
        Self {
            level: parsed.level.max(1),
            parent: parsed.parent,
            places,
        }
    }

    fn nested(&self, place: &str) -> ContentAction {
        ContentAction::Open {
            content_type: PLACE_SELECTOR.into(),
            props: json!({ "level": self.level + 1, "parent": place }),
            options: OpenOptions::new()
                .title(format!("Around {place}"))
                .allow_duplicate(true),
        }
    }
}

fn default_places(parent: Option<&str>) -> Vec<String> {
    let names: &[&str] = match parent {
        None => &["Lisbon", "Porto", "Madeira", "Azores"],
        Some(_) => &["Old town", "Waterfront", "Hillside", "Market quarter"],
    };
    names.iter().map(|s| s.to_string()).collect()
}

impl DrawerContent for PlaceSelector {
    fn focusable_count(&self) -> usize {
        self.places.len()
    }

    fn on_props(&mut self, props: &Props) {
        let parsed: PlaceProps = parse(props);
        if !parsed.places.is_empty() {
            self.places = parsed.places;
        }
    }
}

impl TuiContent for PlaceSelector {
    fn render(&self, f: &mut Frame, area: Rect, focus: Option<FocusTarget>) {
        let heading = match &self.parent {
            Some(parent) => format!("Level {} · {parent}", self.level),
            None => format!("Level {}", self.level),
        };
        let mut lines = vec![Line::from(Span::styled(heading, theme::muted())), Line::from("")];
        for (i, place) in self.places.iter().enumerate() {
            let style = if is_focused(focus, i) {
                theme::focused()
            } else {
                theme::text()
            };
            lines.push(Line::from(Span::styled(format!(" {place} "), style)));
        }
        f.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, focus: Option<FocusTarget>) -> Option<ContentAction> {
        if key.code != KeyCode::Enter {
            return None;
        }
        let Some(FocusTarget::Element(i)) = focus else {
            return None;
        };
        let place = self.places.get(i)?;
        if self.level < MAX_PLACE_DEPTH {
            Some(self.nested(place))
        } else {
            Some(ContentAction::Back)
        }
    }
}

// ── Meal editor ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MealKind {
    Breakfast,
    #[default]
    Lunch,
    Dinner,
    Snack,
}

impl MealKind {
    pub fn label(self) -> &'static str {
        match self {
            MealKind::Breakfast => "Breakfast",
            MealKind::Lunch => "Lunch",
            MealKind::Dinner => "Dinner",
            MealKind::Snack => "Snack",
        }
    }

    pub fn next(self) -> Self {
        match self {
            MealKind::Breakfast => MealKind::Lunch,
            MealKind::Lunch => MealKind::Dinner,
            MealKind::Dinner => MealKind::Snack,
            MealKind::Snack => MealKind::Breakfast,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MealProps {
    name: Option<String>,
}

const MEAL_NAME: usize = 0;
const MEAL_KIND: usize = 1;
const MEAL_SAVE: usize = 2;

/// Name field, kind selector and Save. Typing goes to the name field while
/// it holds focus.
#[derive(Debug)]
pub struct MealEditor {
    pub name: String,
    pub kind: MealKind,
}

impl MealEditor {
    fn from_props(props: &Props) -> Self {
        Self {
            name: parse::<MealProps>(props).name.unwrap_or_default(),
            kind: MealKind::default(),
        }
    }
}

impl DrawerContent for MealEditor {
    fn focusable_count(&self) -> usize {
        3
    }

    fn on_props(&mut self, props: &Props) {
        if let Some(name) = parse::<MealProps>(props).name {
            self.name = name;
        }
    }
}

impl TuiContent for MealEditor {
    fn render(&self, f: &mut Frame, area: Rect, focus: Option<FocusTarget>) {
        let field = |i: usize| {
            if is_focused(focus, i) {
                theme::focused()
            } else {
                theme::text()
            }
        };
        let cursor = if is_focused(focus, MEAL_NAME) { "_" } else { "" };
        let lines = vec![
            Line::from(vec![
                Span::styled("Name  ", theme::muted()),
                Span::styled(format!(" {}{cursor} ", self.name), field(MEAL_NAME)),
            ]),
            Line::from(vec![
                Span::styled("Kind  ", theme::muted()),
                Span::styled(format!(" {} ", self.kind.label()), field(MEAL_KIND)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                " Save ",
                if is_focused(focus, MEAL_SAVE) {
                    theme::focused()
                } else {
                    theme::positive()
                },
            )),
        ];
        f.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, focus: Option<FocusTarget>) -> Option<ContentAction> {
        match (focus, key.code) {
            (Some(FocusTarget::Element(MEAL_NAME)), KeyCode::Char(c)) => {
                self.name.push(c);
                Some(ContentAction::None)
            }
            (Some(FocusTarget::Element(MEAL_NAME)), KeyCode::Backspace) => {
                self.name.pop();
                Some(ContentAction::None)
            }
            (Some(FocusTarget::Element(MEAL_KIND)), _) if activates(&key) => {
                self.kind = self.kind.next();
                Some(ContentAction::None)
            }
            (Some(FocusTarget::Element(MEAL_SAVE)), _) if activates(&key) => {
                tracing::info!(name = %self.name, kind = self.kind.label(), "meal saved");
                Some(ContentAction::Close)
            }
            _ => None,
        }
    }
}

// ── Hotel picker ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Hotel {
    pub name: String,
    pub nightly: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HotelProps {
    hotels: Vec<Hotel>,
}

/// Fullscreen list; choosing a hotel closes the picker.
#[derive(Debug)]
pub struct HotelPicker {
    pub hotels: Vec<Hotel>,
    pub chosen: Option<usize>,
}

impl HotelPicker {
    fn from_props(props: &Props) -> Self {
        let parsed: HotelProps = parse(props);
        let hotels = if parsed.hotels.is_empty() {
            vec![
                Hotel { name: "Casa do Rio".into(), nightly: 140 },
                Hotel { name: "Miradouro Suites".into(), nightly: 210 },
                Hotel { name: "Hostel Alfama".into(), nightly: 45 },
            ]
        } else {
            parsed.hotels
        };
        Self { hotels, chosen: None }
    }
}

impl DrawerContent for HotelPicker {
    fn focusable_count(&self) -> usize {
        self.hotels.len()
    }
}

impl TuiContent for HotelPicker {
    fn render(&self, f: &mut Frame, area: Rect, focus: Option<FocusTarget>) {
        let mut lines = Vec::with_capacity(self.hotels.len() + 2);
        lines.push(Line::from(Span::styled("Where to stay", theme::accent_bold())));
        lines.push(Line::from(""));
        for (i, hotel) in self.hotels.iter().enumerate() {
            let style = if is_focused(focus, i) {
                theme::focused()
            } else if self.chosen == Some(i) {
                theme::positive()
            } else {
                theme::text()
            };
            lines.push(Line::from(Span::styled(
                format!(" {:<24} €{:>4}/night ", hotel.name, hotel.nightly),
                style,
            )));
        }
        f.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, focus: Option<FocusTarget>) -> Option<ContentAction> {
        if key.code != KeyCode::Enter {
            return None;
        }
        let Some(FocusTarget::Element(i)) = focus else {
            return None;
        };
        let hotel = self.hotels.get(i)?;
        tracing::info!(hotel = %hotel.name, "hotel chosen");
        self.chosen = Some(i);
        Some(ContentAction::Close)
    }
}
