//! Gamepad input using GilRs
//!
//! Lets a desktop host drive the XR code paths without a headset: one
//! physical gamepad is sampled once per frame and presented as a pair of
//! xr-standard controllers (see [`buttons`] for the layout).

pub mod buttons;
pub mod normalize;

use anyhow::{anyhow, Result};
use gilrs::{Axis, Button, Event, EventType, GamepadId, Gilrs};
use glam::Vec3;
use tracing::{debug, info, trace};

use crate::input::xr::{ButtonSample, ControllerSample, Handedness, XrFrame};
use crate::spatial::Ray;

use buttons::{emulated_slot, EMULATED_BUTTONS};
use normalize::stick_to_thumbstick;

/// Resting grip position of the emulated right hand (tracking space, metres)
pub const RIGHT_GRIP_REST: Vec3 = Vec3::new(0.25, 1.1, -0.35);
/// Resting grip position of the emulated left hand
pub const LEFT_GRIP_REST: Vec3 = Vec3::new(-0.25, 1.1, -0.35);
/// How far the D-pad moves the emulated right hand per poll
const DPAD_NUDGE: f32 = 0.02;

/// Read-only view of a pad's current state
pub trait PadState {
    fn is_pressed(&self, button: Button) -> bool;
    fn axis(&self, axis: Axis) -> f32;
}

impl PadState for gilrs::Gamepad<'_> {
    fn is_pressed(&self, button: Button) -> bool {
        gilrs::Gamepad::is_pressed(self, button)
    }

    fn axis(&self, axis: Axis) -> f32 {
        self.value(axis)
    }
}

/// Build both emulated controllers from one pad
///
/// The left stick becomes the right (movement) thumbstick, the right stick
/// becomes the left thumbstick used for console scrolling.
pub fn emulate(pad: &impl PadState, right_hand_offset: Vec3) -> XrFrame {
    let hand = |handedness: Handedness, stick: (Axis, Axis), grip: Vec3| {
        let (x, y) = stick_to_thumbstick(pad.axis(stick.0), pad.axis(stick.1));
        let mut buttons = vec![ButtonSample::default(); 6];
        for (button, owner, index) in EMULATED_BUTTONS {
            if *owner == handedness {
                buttons[*index].pressed = pad.is_pressed(*button);
            }
        }
        ControllerSample {
            handedness: Some(handedness),
            axes: vec![0.0, 0.0, x, y],
            buttons,
            grip_position: grip,
            target_ray: Ray::new(grip, Vec3::NEG_Z),
        }
    };

    XrFrame::new(vec![
        hand(
            Handedness::Right,
            (Axis::LeftStickX, Axis::LeftStickY),
            RIGHT_GRIP_REST + right_hand_offset,
        ),
        hand(
            Handedness::Left,
            (Axis::RightStickX, Axis::RightStickY),
            LEFT_GRIP_REST,
        ),
    ])
}

/// Move the emulated right hand with the D-pad (up pushes it forward)
pub fn nudge_hand(pad: &impl PadState, offset: Vec3) -> Vec3 {
    let mut offset = offset;
    if pad.is_pressed(Button::DPadUp) {
        offset.z -= DPAD_NUDGE;
    }
    if pad.is_pressed(Button::DPadDown) {
        offset.z += DPAD_NUDGE;
    }
    if pad.is_pressed(Button::DPadLeft) {
        offset.x -= DPAD_NUDGE;
    }
    if pad.is_pressed(Button::DPadRight) {
        offset.x += DPAD_NUDGE;
    }
    offset
}

/// Polling bridge from gilrs to XR frames
pub struct GamepadBridge {
    gilrs: Gilrs,
    active: Option<GamepadId>,
    right_hand_offset: Vec3,
}

impl GamepadBridge {
    /// Initialize gilrs
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| anyhow!("Failed to initialize gilrs: {}", e))?;
        for (_id, gamepad) in gilrs.gamepads() {
            info!("🎮 Gamepad found: {}", gamepad.name());
        }
        Ok(Self {
            gilrs,
            active: None,
            right_hand_offset: Vec3::ZERO,
        })
    }

    /// Drain pending gilrs events and sample the active pad
    ///
    /// Returns `None` when no pad is connected; the session then treats both
    /// hands as untracked.
    pub fn poll(&mut self) -> Option<XrFrame> {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("🎮 Gamepad connected: {}", self.gilrs.gamepad(id).name());
                    self.active.get_or_insert(id);
                }
                EventType::Disconnected => {
                    info!("🎮 Gamepad disconnected: {}", self.gilrs.gamepad(id).name());
                    if self.active == Some(id) {
                        self.active = None;
                        self.right_hand_offset = Vec3::ZERO;
                    }
                }
                EventType::ButtonPressed(button, _) => {
                    match emulated_slot(button) {
                        Some((hand, slot)) => trace!("Pad {:?} -> {} controller button {}", button, hand, slot),
                        None => trace!("Pad {:?} not mapped", button),
                    }
                    self.active.get_or_insert(id);
                }
                _ => {
                    self.active.get_or_insert(id);
                }
            }
        }

        if self.active.is_none() {
            self.active = self.gilrs.gamepads().next().map(|(id, _)| id);
            if let Some(id) = self.active {
                debug!("Using gamepad {}", self.gilrs.gamepad(id).name());
            }
        }

        let pad = self.gilrs.gamepad(self.active?);
        if !pad.is_connected() {
            return None;
        }
        self.right_hand_offset = nudge_hand(&pad, self.right_hand_offset);
        Some(emulate(&pad, self.right_hand_offset))
    }
}
