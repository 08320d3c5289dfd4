use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque drawer identifier, assigned by the store at push time.
///
/// Ids are never reused within a session. A revived keep-state entry keeps
/// the id it was first assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DrawerId(pub u64);

impl fmt::Display for DrawerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drawer#{}", self.0)
    }
}

impl From<u64> for DrawerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Tag naming the collaborator that renders a drawer body
/// (e.g. `trip-settings`, `place-selector`).
///
/// The core routes on it and never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(pub String);

impl ContentType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for ContentType {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

/// Handle returned by `DrawerStore::subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawer_id_display() {
        assert_eq!(DrawerId(7).to_string(), "drawer#7");
    }

    #[test]
    fn content_type_serializes_as_plain_string() {
        let tag = ContentType::from("trip-settings");
        let json = serde_json::to_string(&tag).unwrap();
        assert_eq!(json, "\"trip-settings\"");
    }
}
