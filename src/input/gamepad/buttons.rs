//! Gamepad button layout for controller emulation
//!
//! One physical gamepad plays both XR hands. Right-side controls drive the
//! right (movement) hand, left-side controls drive the left hand:
//!
//! ```text
//!   LT/LB  -> left trigger / squeeze      RT/RB -> right trigger / squeeze
//!   West   -> left X  (info)              South -> right A (next image)
//!   North  -> left Y  (menu)              East  -> right B (previous image)
//!   Select -> left stick click (console)  Start -> right stick click (controller info)
//! ```

use gilrs::Button;

use crate::input::xr::{
    Handedness, BUTTON_PRIMARY, BUTTON_SECONDARY, BUTTON_SQUEEZE, BUTTON_THUMBSTICK,
    BUTTON_TRIGGER,
};

/// Every gamepad button the bridge reads, with its emulated hand and xr-standard slot
pub const EMULATED_BUTTONS: &[(Button, Handedness, usize)] = &[
    (Button::RightTrigger2, Handedness::Right, BUTTON_TRIGGER),
    (Button::RightTrigger, Handedness::Right, BUTTON_SQUEEZE),
    (Button::Start, Handedness::Right, BUTTON_THUMBSTICK),
    (Button::South, Handedness::Right, BUTTON_PRIMARY),
    (Button::East, Handedness::Right, BUTTON_SECONDARY),
    (Button::LeftTrigger2, Handedness::Left, BUTTON_TRIGGER),
    (Button::LeftTrigger, Handedness::Left, BUTTON_SQUEEZE),
    (Button::Select, Handedness::Left, BUTTON_THUMBSTICK),
    (Button::West, Handedness::Left, BUTTON_PRIMARY),
    (Button::North, Handedness::Left, BUTTON_SECONDARY),
];

/// Emulated (hand, slot) for a gamepad button, `None` if the bridge ignores it
pub fn emulated_slot(button: Button) -> Option<(Handedness, usize)> {
    EMULATED_BUTTONS
        .iter()
        .find(|(candidate, _, _)| *candidate == button)
        .map(|(_, hand, index)| (*hand, *index))
}
