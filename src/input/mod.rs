//! Input source abstraction
//!
//! Turns raw device state (held keys, mouse deltas, XR controller samples)
//! into one immutable [`InputSnapshot`] per frame plus the discrete
//! [`InputEvent`]s that fired this frame.

pub mod analog;
pub mod desktop;
pub mod edge;
pub mod gamepad;
pub mod sampler;
pub mod xr;

use glam::{Vec2, Vec3};

use crate::spatial::Ray;

pub use desktop::{Key, KeySet, KeyboardEvent, KeyboardState, MouseFrame};
pub use edge::{ActionEdges, ButtonEdgeTracker};
pub use sampler::{InputSampler, RawInput, SampleContext, SampledFrame, SamplerSettings};
pub use xr::{ButtonSample, ControllerSample, Handedness, XrFrame};

/// Discrete, edge-triggered actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    MenuToggle,
    NextImage,
    PrevImage,
    InfoToggle,
    ConsoleToggle,
    ControllerInfoToggle,
    MenuItemSelect,
}

/// Physical origin of a button signal; edges are tracked per source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard,
    Mouse,
    LeftHand,
    RightHand,
}

impl From<Handedness> for InputSource {
    fn from(hand: Handedness) -> Self {
        match hand {
            Handedness::Left => InputSource::LeftHand,
            Handedness::Right => InputSource::RightHand,
        }
    }
}

/// Notification produced by the sampler for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MenuToggle,
    NextImage,
    PrevImage,
    InfoToggle,
    ConsoleToggle,
    ControllerInfoToggle,
    MenuItemSelect,
    /// Menu scroll amount in panel units (positive reveals later items)
    MenuScroll(f32),
    /// Console scroll in columns/lines
    ConsoleScroll(f32, f32),
}

impl From<Action> for InputEvent {
    fn from(action: Action) -> Self {
        match action {
            Action::MenuToggle => InputEvent::MenuToggle,
            Action::NextImage => InputEvent::NextImage,
            Action::PrevImage => InputEvent::PrevImage,
            Action::InfoToggle => InputEvent::InfoToggle,
            Action::ConsoleToggle => InputEvent::ConsoleToggle,
            Action::ControllerInfoToggle => InputEvent::ControllerInfoToggle,
            Action::MenuItemSelect => InputEvent::MenuItemSelect,
        }
    }
}

/// Dead-zoned analog axes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Axes {
    /// Movement thumbstick X (right is positive)
    pub turn: f32,
    /// Movement thumbstick Y (pushed forward is negative)
    pub vertical: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
}

/// Button levels for this frame, merged across sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub trigger: bool,
    pub grip: bool,
    pub menu: bool,
    pub next: bool,
    pub prev: bool,
    pub console_toggle: bool,
    pub info_toggle: bool,
    pub controller_info_toggle: bool,
}

impl Buttons {
    /// OR a level signal into the slot for `action`
    pub fn set(&mut self, action: Action, pressed: bool) {
        let slot = match action {
            Action::MenuToggle => &mut self.menu,
            Action::NextImage => &mut self.next,
            Action::PrevImage => &mut self.prev,
            Action::InfoToggle => &mut self.info_toggle,
            Action::ConsoleToggle => &mut self.console_toggle,
            Action::ControllerInfoToggle => &mut self.controller_info_toggle,
            Action::MenuItemSelect => &mut self.trigger,
        };
        *slot |= pressed;
    }
}

/// Immutable per-frame view of every input the core consumes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub axes: Axes,
    pub buttons: Buttons,
    pub keys: KeySet,
    /// Mouse movement while dragging, in pixels
    pub mouse_drag: Vec2,
    /// Grip position of the movement hand in tracking space
    pub clutch_hand: Option<Vec3>,
    /// Pointing ray of the movement hand in tracking space
    pub pointer: Option<Ray>,
    /// Flat-menu pointer hover
    pub hover: Option<usize>,
}

impl InputSnapshot {
    pub fn key(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// `1.0` if any of `positive` is held, `-1.0` for `negative`, summed
    pub fn key_axis(&self, positive: &[Key], negative: &[Key]) -> f32 {
        let pos = positive.iter().any(|k| self.key(*k)) as i32;
        let neg = negative.iter().any(|k| self.key(*k)) as i32;
        (pos - neg) as f32
    }
}
