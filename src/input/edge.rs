//! Edge detection for held buttons
//!
//! Converts a level signal ("is the button down this frame?") into a single
//! event per physical press. One tracker exists per action per source, so a
//! held trigger on the left hand never masks a press on the right hand.

use std::collections::HashMap;

use super::{Action, InputSource};

/// Rising-edge detector for one button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonEdgeTracker {
    was_pressed: bool,
}

impl ButtonEdgeTracker {
    /// Create a tracker in the released state
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this frame's level and report whether the press edge happened now
    ///
    /// Returns `true` only on the first frame `pressed == true` after a frame
    /// with `pressed == false`. Releasing re-arms the tracker.
    pub fn update(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }

    /// Whether the button was down on the last update
    pub fn is_held(&self) -> bool {
        self.was_pressed
    }

    /// Forget the held state (e.g. when the device disappears)
    pub fn reset(&mut self) {
        self.was_pressed = false;
    }
}

/// Edge trackers keyed by (source, action)
#[derive(Debug, Default, Clone)]
pub struct ActionEdges {
    trackers: HashMap<(InputSource, Action), ButtonEdgeTracker>,
}

impl ActionEdges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the tracker for `action` on `source`; `true` when it fires this frame
    pub fn update(&mut self, source: InputSource, action: Action, pressed: bool) -> bool {
        self.trackers
            .entry((source, action))
            .or_default()
            .update(pressed)
    }

    /// Whether `action` on `source` is currently held
    pub fn is_held(&self, source: InputSource, action: Action) -> bool {
        self.trackers
            .get(&(source, action))
            .map(ButtonEdgeTracker::is_held)
            .unwrap_or(false)
    }

    /// Release every tracker belonging to `source`
    pub fn release_source(&mut self, source: InputSource) {
        for ((tracked, _), tracker) in self.trackers.iter_mut() {
            if *tracked == source {
                tracker.reset();
            }
        }
    }
}
