//! Interaction events.

use serde::{Deserialize, Serialize};

/// A keyboard key, as far as views care about keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Escape,
    /// Any other key, by key code.
    Other(u32),
}

impl Key {
    /// Key for a DOM key code.
    pub fn from_code(code: u32) -> Self {
        match code {
            13 => Key::Enter,
            27 => Key::Escape,
            other => Key::Other(other),
        }
    }

    /// DOM key code.
    pub fn code(self) -> u32 {
        match self {
            Key::Enter => 13,
            Key::Escape => 27,
            Key::Other(code) => code,
        }
    }
}

/// Event kinds a binding can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Click,
    DoubleClick,
    Blur,
    Input,
    KeyUp,
    Change,
}

/// Closed set of interaction events delivered to bindings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomEvent {
    Click,
    DoubleClick,
    Blur,
    /// The value of a text input changed.
    Input { value: String },
    /// A key was released in a text input holding `value`.
    KeyUp { key: Key, value: String },
    /// A checkbox changed.
    Change { checked: bool },
}

impl DomEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomEvent::Click => EventKind::Click,
            DomEvent::DoubleClick => EventKind::DoubleClick,
            DomEvent::Blur => EventKind::Blur,
            DomEvent::Input { .. } => EventKind::Input,
            DomEvent::KeyUp { .. } => EventKind::KeyUp,
            DomEvent::Change { .. } => EventKind::Change,
        }
    }

    /// Text value carried by input and key events.
    pub fn value(&self) -> Option<&str> {
        match self {
            DomEvent::Input { value } | DomEvent::KeyUp { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Key of a key event.
    pub fn key(&self) -> Option<Key> {
        match self {
            DomEvent::KeyUp { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Checked flag of a change event.
    pub fn checked(&self) -> Option<bool> {
        match self {
            DomEvent::Change { checked } => Some(*checked),
            _ => None,
        }
    }
}
