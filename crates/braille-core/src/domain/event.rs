//! Normalized input events.
//!
//! Every vendor report, whatever its byte layout, is reduced to a sequence of
//! [`BrailleEvent`]s.  Events are transient: they are produced by a driver's
//! decode step, forwarded, and dropped.

use serde::{Deserialize, Serialize};

/// Kind of input an event represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A literal character typed on the device.
    Text,
    /// A navigation key such as `enter` or `escape`.
    Nav,
    /// Several Braille keyboard dots pressed together.
    Chord,
    /// A cursor-routing key above one display cell.
    Routing,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Text => "text",
            EventKind::Nav => "nav",
            EventKind::Chord => "chord",
            EventKind::Routing => "routing",
        }
    }
}

/// One normalized input event from a Braille device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrailleEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Symbolic key names in byte order (or ascending dot order for chords).
    pub keys: Vec<String>,
    /// Literal text payload for [`EventKind::Text`] events.
    pub text: Option<String>,
    /// Identifier of the device the triggering report came from.
    pub device_id: Option<String>,
}

impl BrailleEvent {
    pub fn text(text: impl Into<String>, device_id: Option<&str>) -> Self {
        Self {
            kind: EventKind::Text,
            keys: Vec::new(),
            text: Some(text.into()),
            device_id: device_id.map(str::to_string),
        }
    }

    pub fn nav(key: &str, device_id: Option<&str>) -> Self {
        Self::with_keys(EventKind::Nav, vec![key.to_string()], device_id)
    }

    /// A chord event for the given 1-based dots, keyed `dot1`..`dot8`.
    pub fn chord(dots: &[u8], device_id: Option<&str>) -> Self {
        let keys = dots.iter().map(|d| format!("dot{d}")).collect();
        Self::with_keys(EventKind::Chord, keys, device_id)
    }

    /// A routing event for the 0-based cell `index`, keyed `cell-<index>`.
    pub fn routing(index: u8, device_id: Option<&str>) -> Self {
        Self::with_keys(EventKind::Routing, vec![format!("cell-{index}")], device_id)
    }

    fn with_keys(kind: EventKind, keys: Vec<String>, device_id: Option<&str>) -> Self {
        Self {
            kind,
            keys,
            text: None,
            device_id: device_id.map(str::to_string),
        }
    }

    /// Returns `true` if `key` is one of this event's symbolic keys.
    pub fn has_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}
