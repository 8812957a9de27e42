//! XR controller samples
//!
//! One `ControllerSample` per tracked input source per frame, in the
//! xr-standard gamepad layout. Controllers are looked up by the handedness
//! they report *this frame*, never by their position in the source list:
//! runtimes are free to reorder sources or swap handedness between sessions.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::analog::axis_or_neutral;
use crate::spatial::Ray;

/// Trigger (select)
pub const BUTTON_TRIGGER: usize = 0;
/// Squeeze / grip
pub const BUTTON_SQUEEZE: usize = 1;
/// Thumbstick click
pub const BUTTON_THUMBSTICK: usize = 3;
/// A on the right hand, X on the left hand
pub const BUTTON_PRIMARY: usize = 4;
/// B on the right hand, Y on the left hand
pub const BUTTON_SECONDARY: usize = 5;

/// Thumbstick horizontal axis
pub const AXIS_THUMBSTICK_X: usize = 2;
/// Thumbstick vertical axis (pushed forward is negative)
pub const AXIS_THUMBSTICK_Y: usize = 3;

/// Which hand a controller is held in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn other(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

impl std::fmt::Display for Handedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handedness::Left => write!(f, "left"),
            Handedness::Right => write!(f, "right"),
        }
    }
}

/// Button state as reported by the device
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ButtonSample {
    pub pressed: bool,
}

impl ButtonSample {
    pub fn new(pressed: bool) -> Self {
        Self { pressed }
    }
}

/// State of one tracked controller for one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerSample {
    /// Reported handedness (`None` for sources without one, e.g. gaze)
    pub handedness: Option<Handedness>,
    pub axes: Vec<f32>,
    pub buttons: Vec<ButtonSample>,
    /// Grip position in tracking (rig-local) space
    pub grip_position: Vec3,
    /// Pointing ray in tracking space, if the source has one
    pub target_ray: Option<Ray>,
}

impl ControllerSample {
    /// Button level by index; absent buttons read as released
    pub fn pressed(&self, index: usize) -> bool {
        self.buttons.get(index).map(|b| b.pressed).unwrap_or(false)
    }

    /// Axis value by index; absent axes read as neutral
    pub fn axis(&self, index: usize) -> f32 {
        axis_or_neutral(&self.axes, index)
    }

    pub fn thumbstick(&self) -> (f32, f32) {
        (self.axis(AXIS_THUMBSTICK_X), self.axis(AXIS_THUMBSTICK_Y))
    }
}

/// All input sources visible in one XR frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XrFrame {
    pub sources: Vec<ControllerSample>,
}

impl XrFrame {
    pub fn new(sources: Vec<ControllerSample>) -> Self {
        Self { sources }
    }

    /// First source currently reporting `hand`, if it is tracked this frame
    pub fn controller(&self, hand: Handedness) -> Option<&ControllerSample> {
        self.sources
            .iter()
            .find(|source| source.handedness == Some(hand))
    }
}
