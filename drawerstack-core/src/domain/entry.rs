//! Drawer entries, caller options, and the animation lifecycle states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::{ContentType, DrawerId};

/// Opaque data handed to the content collaborator. The core never reads it.
pub type Props = serde_json::Value;

/// Width token for side panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeToken {
    Sm,
    Md,
    Lg,
    Xl,
    /// 100% of the viewport.
    Full,
}

impl SizeToken {
    pub const ALL: [SizeToken; 5] = [
        SizeToken::Sm,
        SizeToken::Md,
        SizeToken::Lg,
        SizeToken::Xl,
        SizeToken::Full,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeToken::Sm => "sm",
            SizeToken::Md => "md",
            SizeToken::Lg => "lg",
            SizeToken::Xl => "xl",
            SizeToken::Full => "full",
        }
    }
}

impl fmt::Display for SizeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeToken {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sm" => Ok(SizeToken::Sm),
            "md" => Ok(SizeToken::Md),
            "lg" => Ok(SizeToken::Lg),
            "xl" => Ok(SizeToken::Xl),
            "full" => Ok(SizeToken::Full),
            other => Err(format!("unknown size token '{other}'")),
        }
    }
}

/// Caller-declared presentation hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PresentationRequest {
    /// Let the viewport decide (sheet on mobile, side panel on desktop).
    #[default]
    Auto,
    /// Always fullscreen, on every viewport.
    Fullscreen,
    /// Side panel of the given width on desktop; sheet on mobile.
    Size(SizeToken),
}

impl fmt::Display for PresentationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationRequest::Auto => f.write_str("auto"),
            PresentationRequest::Fullscreen => f.write_str("fullscreen"),
            PresentationRequest::Size(token) => f.write_str(token.as_str()),
        }
    }
}

impl FromStr for PresentationRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(PresentationRequest::Auto),
            "fullscreen" => Ok(PresentationRequest::Fullscreen),
            other => other
                .parse::<SizeToken>()
                .map(PresentationRequest::Size)
                .map_err(|_| format!("unknown presentation request '{other}'")),
        }
    }
}

impl TryFrom<String> for PresentationRequest {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PresentationRequest> for String {
    fn from(value: PresentationRequest) -> Self {
        value.to_string()
    }
}

/// Animation lifecycle of a drawer: entering → open → exiting → closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    Entering,
    Open,
    Exiting,
    /// Terminal. A closed entry is either destroyed or parked in the hidden pool.
    Closed,
}

impl AnimationState {
    /// Entering or open: the drawer is requested and not on its way out.
    pub fn is_live(self) -> bool {
        matches!(self, AnimationState::Entering | AnimationState::Open)
    }

    /// Anything that still needs a shell in the render tree.
    pub fn is_mounted(self) -> bool {
        !matches!(self, AnimationState::Closed)
    }

    pub fn label(self) -> &'static str {
        match self {
            AnimationState::Entering => "entering",
            AnimationState::Open => "open",
            AnimationState::Exiting => "exiting",
            AnimationState::Closed => "closed",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happens to an entry once its exit animation completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitDisposition {
    /// Park in the hidden pool (keep-state-on-close).
    Retain,
    /// Drop the entry and its content.
    Destroy,
}

/// Options accepted by `open`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenOptions {
    pub title: Option<String>,
    pub presentation: PresentationRequest,
    /// Side-panel width when `presentation` is `Auto`. Falls back to the
    /// configured default size.
    pub size: Option<SizeToken>,
    pub keep_state_on_close: bool,
    /// Push a second live entry of the same content type instead of reusing
    /// the live one (nested selectors).
    pub allow_duplicate: bool,
    /// Ignore any retained entry for this content type and start fresh.
    pub force_reset: bool,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn presentation(mut self, request: PresentationRequest) -> Self {
        self.presentation = request;
        self
    }

    pub fn size(mut self, size: SizeToken) -> Self {
        self.size = Some(size);
        self
    }

    pub fn keep_state_on_close(mut self, keep: bool) -> Self {
        self.keep_state_on_close = keep;
        self
    }

    pub fn allow_duplicate(mut self, allow: bool) -> Self {
        self.allow_duplicate = allow;
        self
    }

    pub fn force_reset(mut self, reset: bool) -> Self {
        self.force_reset = reset;
        self
    }
}

/// One requested overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawerEntry {
    pub id: DrawerId,
    pub content_type: ContentType,
    pub props: Props,
    pub title: Option<String>,
    pub presentation: PresentationRequest,
    pub size: Option<SizeToken>,
    pub keep_state_on_close: bool,
    pub animation_state: AnimationState,
    /// How many times this logical entry has been opened (revivals included).
    pub open_count: u32,
    pub(crate) disposition: ExitDisposition,
}

impl DrawerEntry {
    pub(crate) fn new(id: DrawerId, content_type: ContentType, props: Props, options: &OpenOptions) -> Self {
        Self {
            id,
            content_type,
            props,
            title: options.title.clone(),
            presentation: options.presentation,
            size: options.size,
            keep_state_on_close: options.keep_state_on_close,
            animation_state: AnimationState::Entering,
            open_count: 1,
            disposition: default_disposition(options.keep_state_on_close),
        }
    }

    /// Re-apply caller options on revival. Props are replaced; the id and
    /// open count carry over.
    pub(crate) fn revive_with(&mut self, props: Props, options: &OpenOptions) {
        self.props = props;
        if options.title.is_some() {
            self.title = options.title.clone();
        }
        self.presentation = options.presentation;
        if options.size.is_some() {
            self.size = options.size;
        }
        self.keep_state_on_close = options.keep_state_on_close;
        self.disposition = default_disposition(options.keep_state_on_close);
        self.open_count += 1;
    }

    pub fn disposition(&self) -> ExitDisposition {
        self.disposition
    }
}

fn default_disposition(keep_state_on_close: bool) -> ExitDisposition {
    if keep_state_on_close {
        ExitDisposition::Retain
    } else {
        ExitDisposition::Destroy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_request_parses_tokens() {
        assert_eq!("auto".parse::<PresentationRequest>(), Ok(PresentationRequest::Auto));
        assert_eq!(
            "Fullscreen".parse::<PresentationRequest>(),
            Ok(PresentationRequest::Fullscreen)
        );
        assert_eq!(
            "lg".parse::<PresentationRequest>(),
            Ok(PresentationRequest::Size(SizeToken::Lg))
        );
        assert!("huge".parse::<PresentationRequest>().is_err());
    }

    #[test]
    fn presentation_request_serde_uses_plain_strings() {
        let json = serde_json::to_string(&PresentationRequest::Size(SizeToken::Xl)).unwrap();
        assert_eq!(json, "\"xl\"");
        let back: PresentationRequest = serde_json::from_str("\"fullscreen\"").unwrap();
        assert_eq!(back, PresentationRequest::Fullscreen);
    }

    #[test]
    fn live_and_mounted_states() {
        assert!(AnimationState::Entering.is_live());
        assert!(AnimationState::Open.is_live());
        assert!(!AnimationState::Exiting.is_live());
        assert!(AnimationState::Exiting.is_mounted());
        assert!(!AnimationState::Closed.is_mounted());
    }

    #[test]
    fn revive_replaces_props_and_counts_opens() {
        let options = OpenOptions::new().keep_state_on_close(true).title("Settings");
        let mut entry = DrawerEntry::new(
            DrawerId(1),
            ContentType::from("trip-settings"),
            serde_json::json!({"trip": 1}),
            &options,
        );
        assert_eq!(entry.disposition(), ExitDisposition::Retain);

        entry.revive_with(serde_json::json!({"trip": 2}), &OpenOptions::new().keep_state_on_close(true));
        assert_eq!(entry.props, serde_json::json!({"trip": 2}));
        assert_eq!(entry.title.as_deref(), Some("Settings"));
        assert_eq!(entry.open_count, 2);
    }
}
