//! Desktop keyboard and mouse state
//!
//! Key identifiers arrive as strings (browser `KeyboardEvent.key` style). They
//! are normalized to lowercase and mapped onto a fixed set of recognized keys;
//! anything else is dropped at this boundary.

use std::collections::BTreeSet;

use glam::Vec2;
use tracing::trace;

/// Keys the gallery reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
    F,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    M,
    N,
    P,
    I,
    C,
    H,
    PageUp,
    PageDown,
    Enter,
}

impl Key {
    /// Map a key identifier to a recognized key (case-insensitive)
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let key = match identifier.trim().to_lowercase().as_str() {
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "q" => Key::Q,
            "e" => Key::E,
            "r" => Key::R,
            "f" => Key::F,
            "arrowup" => Key::ArrowUp,
            "arrowdown" => Key::ArrowDown,
            "arrowleft" => Key::ArrowLeft,
            "arrowright" => Key::ArrowRight,
            "m" => Key::M,
            "n" => Key::N,
            "p" => Key::P,
            "i" => Key::I,
            "c" => Key::C,
            "h" => Key::H,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "enter" => Key::Enter,
            _ => return None,
        };
        Some(key)
    }
}

/// Set of currently held keys
pub type KeySet = BTreeSet<Key>;

/// A key-down or key-up notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key: String,
    pub pressed: bool,
}

impl KeyboardEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: true,
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: false,
        }
    }
}

/// Held-key tracker fed by key events between frames
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    held: KeySet,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a key event; returns `false` for unrecognized identifiers
    pub fn apply(&mut self, event: &KeyboardEvent) -> bool {
        let Some(key) = Key::from_identifier(&event.key) else {
            trace!("Ignoring unrecognized key: {:?}", event.key);
            return false;
        };
        if event.pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
        true
    }

    pub fn held(&self) -> &KeySet {
        &self.held
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Release everything (focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

/// Mouse state accumulated over one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseFrame {
    /// Movement while the drag button was held, in pixels
    pub drag_delta: Vec2,
    /// Wheel movement in lines (positive moves toward later menu items)
    pub wheel: f32,
    /// Primary button level this frame
    pub primary_down: bool,
    /// Flat-menu item under the pointer, if any
    pub hover: Option<usize>,
}
