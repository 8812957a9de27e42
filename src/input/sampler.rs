//! Per-frame input sampling
//!
//! Polls device state once per tick, diffs it against the previous tick's
//! edge trackers and emits at most one event per action per source.

use tracing::debug;

use super::analog::{apply_dead_zone, DEFAULT_DEAD_ZONE};
use super::desktop::{Key, KeySet, MouseFrame};
use super::edge::ActionEdges;
use super::xr::{
    ControllerSample, Handedness, XrFrame, BUTTON_PRIMARY, BUTTON_SECONDARY, BUTTON_SQUEEZE,
    BUTTON_THUMBSTICK, BUTTON_TRIGGER,
};
use super::{Action, Axes, Buttons, InputEvent, InputSnapshot, InputSource};

/// Keyboard bindings for discrete actions
const KEY_BINDINGS: &[(Action, &[Key])] = &[
    (Action::MenuToggle, &[Key::M]),
    (Action::NextImage, &[Key::N, Key::PageDown]),
    (Action::PrevImage, &[Key::P, Key::PageUp]),
    (Action::InfoToggle, &[Key::I]),
    (Action::ConsoleToggle, &[Key::C]),
    (Action::ControllerInfoToggle, &[Key::H]),
    (Action::MenuItemSelect, &[Key::Enter]),
];

/// Face-button bindings per physical hand
fn hand_bindings(hand: Handedness) -> &'static [(Action, usize)] {
    match hand {
        Handedness::Right => &[
            (Action::NextImage, BUTTON_PRIMARY),
            (Action::PrevImage, BUTTON_SECONDARY),
            (Action::ControllerInfoToggle, BUTTON_THUMBSTICK),
        ],
        Handedness::Left => &[
            (Action::InfoToggle, BUTTON_PRIMARY),
            (Action::MenuToggle, BUTTON_SECONDARY),
            (Action::ConsoleToggle, BUTTON_THUMBSTICK),
        ],
    }
}

/// Tuning for the sampler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    pub dead_zone: f32,
    /// Hand whose thumbstick moves the player and whose trigger selects
    pub movement_hand: Handedness,
    /// Menu scroll speed at full stick deflection (panel units per second)
    pub menu_scroll_speed: f32,
    /// Menu scroll per wheel line (panel units)
    pub wheel_step: f32,
    /// Console scroll speed at full stick deflection (lines per second)
    pub console_scroll_speed: f32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_DEAD_ZONE,
            movement_hand: Handedness::Right,
            menu_scroll_speed: 1.5,
            wheel_step: 0.1,
            console_scroll_speed: 12.0,
        }
    }
}

/// Overlay state the sampler needs to route continuous input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleContext {
    pub menu_visible: bool,
    pub console_visible: bool,
}

/// Raw device state for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    pub keys: KeySet,
    pub mouse: MouseFrame,
    /// `None` outside an XR session
    pub xr: Option<XrFrame>,
}

/// Result of sampling one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledFrame {
    pub snapshot: InputSnapshot,
    pub events: Vec<InputEvent>,
}

/// Stateful sampler owning the edge trackers
#[derive(Debug, Clone)]
pub struct InputSampler {
    settings: SamplerSettings,
    edges: ActionEdges,
    /// Grip level of the movement hand when it was last tracked
    movement_grip: bool,
}

impl InputSampler {
    pub fn new(settings: SamplerSettings) -> Self {
        Self {
            settings,
            edges: ActionEdges::new(),
            movement_grip: false,
        }
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    /// Replace tuning without losing held-button state
    pub fn set_settings(&mut self, settings: SamplerSettings) {
        self.settings = settings;
    }

    /// Sample one frame
    pub fn sample(&mut self, dt: f32, raw: &RawInput, ctx: SampleContext) -> SampledFrame {
        let mut buttons = Buttons::default();
        let mut events = Vec::new();

        self.sample_keyboard(&raw.keys, &mut buttons, &mut events);
        self.sample_mouse(&raw.mouse, &mut buttons, &mut events);

        let mut snapshot = InputSnapshot {
            keys: raw.keys.clone(),
            mouse_drag: raw.mouse.drag_delta,
            hover: raw.mouse.hover,
            ..Default::default()
        };

        match &raw.xr {
            Some(frame) => self.sample_xr(frame, ctx, &mut snapshot, &mut buttons, &mut events),
            None => {
                self.edges.release_source(InputSource::LeftHand);
                self.edges.release_source(InputSource::RightHand);
                self.movement_grip = false;
            }
        }
        snapshot.buttons = buttons;

        if ctx.menu_visible {
            let amount = snapshot.axes.vertical * self.settings.menu_scroll_speed * dt
                + raw.mouse.wheel * self.settings.wheel_step;
            if amount != 0.0 {
                events.push(InputEvent::MenuScroll(amount));
            }
        }
        if ctx.console_visible {
            let dx = snapshot.axes.scroll_x * self.settings.console_scroll_speed * dt;
            let dy = snapshot.axes.scroll_y * self.settings.console_scroll_speed * dt;
            if dx != 0.0 || dy != 0.0 {
                events.push(InputEvent::ConsoleScroll(dx, dy));
            }
        }

        SampledFrame { snapshot, events }
    }

    fn sample_keyboard(&mut self, keys: &KeySet, buttons: &mut Buttons, events: &mut Vec<InputEvent>) {
        for (action, bound) in KEY_BINDINGS {
            let pressed = bound.iter().any(|key| keys.contains(key));
            buttons.set(*action, pressed);
            if self.edges.update(InputSource::Keyboard, *action, pressed) {
                debug!("Keyboard action: {:?}", action);
                events.push((*action).into());
            }
        }
    }

    fn sample_mouse(&mut self, mouse: &MouseFrame, buttons: &mut Buttons, events: &mut Vec<InputEvent>) {
        buttons.set(Action::MenuItemSelect, mouse.primary_down);
        if self
            .edges
            .update(InputSource::Mouse, Action::MenuItemSelect, mouse.primary_down)
        {
            events.push(InputEvent::MenuItemSelect);
        }
    }

    fn sample_xr(
        &mut self,
        frame: &XrFrame,
        ctx: SampleContext,
        snapshot: &mut InputSnapshot,
        buttons: &mut Buttons,
        events: &mut Vec<InputEvent>,
    ) {
        let movement_hand = self.settings.movement_hand;
        // A tracking dropout is not a release: the grip holds with no hand position
        buttons.grip = self.movement_grip;

        for hand in [Handedness::Left, Handedness::Right] {
            let source = InputSource::from(hand);
            let Some(controller) = frame.controller(hand) else {
                // Not tracked this frame: skip it and re-arm its buttons
                self.edges.release_source(source);
                continue;
            };

            let mut bindings: Vec<(Action, usize)> = hand_bindings(hand).to_vec();
            if hand == movement_hand {
                bindings.push((Action::MenuItemSelect, BUTTON_TRIGGER));
            }
            for (action, index) in bindings {
                let pressed = controller.pressed(index);
                buttons.set(action, pressed);
                if self.edges.update(source, action, pressed) {
                    debug!("{} controller action: {:?}", hand, action);
                    events.push(action.into());
                }
            }

            if hand == movement_hand {
                self.sample_movement_hand(controller, snapshot, buttons);
            } else if ctx.console_visible {
                let (x, y) = controller.thumbstick();
                snapshot.axes.scroll_x = apply_dead_zone(x, self.settings.dead_zone);
                snapshot.axes.scroll_y = apply_dead_zone(y, self.settings.dead_zone);
            }
        }
    }

    fn sample_movement_hand(
        &mut self,
        controller: &ControllerSample,
        snapshot: &mut InputSnapshot,
        buttons: &mut Buttons,
    ) {
        let (x, y) = controller.thumbstick();
        snapshot.axes = Axes {
            turn: apply_dead_zone(x, self.settings.dead_zone),
            vertical: apply_dead_zone(y, self.settings.dead_zone),
            ..snapshot.axes
        };
        self.movement_grip = controller.pressed(BUTTON_SQUEEZE);
        buttons.grip = self.movement_grip;
        snapshot.clutch_hand = Some(controller.grip_position);
        snapshot.pointer = controller.target_ray;
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new(SamplerSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::xr::ButtonSample;
    use glam::Vec3;

    fn controller(hand: Handedness, stick: (f32, f32), pressed: &[usize]) -> ControllerSample {
        let mut buttons = vec![ButtonSample::default(); 6];
        for index in pressed {
            buttons[*index].pressed = true;
        }
        ControllerSample {
            handedness: Some(hand),
            axes: vec![0.0, 0.0, stick.0, stick.1],
            buttons,
            grip_position: Vec3::new(0.2, 1.0, -0.3),
            target_ray: None,
        }
    }

    fn xr(sources: Vec<ControllerSample>) -> RawInput {
        RawInput {
            xr: Some(XrFrame::new(sources)),
            ..Default::default()
        }
    }

    #[test]
    fn test_keyboard_edge_fires_once_while_held() {
        let mut sampler = InputSampler::default();
        let mut raw = RawInput::default();
        raw.keys.insert(Key::M);

        let first = sampler.sample(0.016, &raw, SampleContext::default());
        let second = sampler.sample(0.016, &raw, SampleContext::default());

        assert_eq!(first.events, vec![InputEvent::MenuToggle]);
        assert!(second.events.is_empty());
        assert!(second.snapshot.buttons.menu);
    }

    #[test]
    fn test_alternate_keys_share_one_action() {
        let mut sampler = InputSampler::default();
        let mut raw = RawInput::default();
        raw.keys.insert(Key::N);
        sampler.sample(0.016, &raw, SampleContext::default());

        // Second binding for the same action held while the first still is: no new edge
        raw.keys.insert(Key::PageDown);
        let frame = sampler.sample(0.016, &raw, SampleContext::default());
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_movement_hand_axes_are_dead_zoned() {
        let mut sampler = InputSampler::default();
        let raw = xr(vec![controller(Handedness::Right, (0.15, -0.8), &[])]);
        let frame = sampler.sample(0.016, &raw, SampleContext::default());

        assert_eq!(frame.snapshot.axes.turn, 0.0);
        assert_eq!(frame.snapshot.axes.vertical, -0.8);
        assert_eq!(frame.snapshot.clutch_hand, Some(Vec3::new(0.2, 1.0, -0.3)));
    }

    #[test]
    fn test_movement_hand_follows_live_handedness() {
        let mut sampler = InputSampler::new(SamplerSettings {
            movement_hand: Handedness::Left,
            ..Default::default()
        });
        // Left controller reported second; lookup is by handedness, not slot
        let raw = xr(vec![
            controller(Handedness::Right, (0.9, 0.9), &[]),
            controller(Handedness::Left, (0.5, 0.0), &[BUTTON_SQUEEZE]),
        ]);
        let frame = sampler.sample(0.016, &raw, SampleContext::default());

        assert_eq!(frame.snapshot.axes.turn, 0.5);
        assert!(frame.snapshot.buttons.grip);
    }

    #[test]
    fn test_console_scroll_only_when_console_visible() {
        let mut sampler = InputSampler::default();
        let raw = xr(vec![
            controller(Handedness::Right, (0.0, 0.0), &[]),
            controller(Handedness::Left, (0.0, 1.0), &[]),
        ]);

        let hidden = sampler.sample(0.5, &raw, SampleContext::default());
        assert_eq!(hidden.snapshot.axes.scroll_y, 0.0);
        assert!(hidden.events.is_empty());

        let visible = sampler.sample(
            0.5,
            &raw,
            SampleContext {
                console_visible: true,
                ..Default::default()
            },
        );
        assert_eq!(visible.snapshot.axes.scroll_y, 1.0);
        assert_eq!(visible.events, vec![InputEvent::ConsoleScroll(0.0, 6.0)]);
    }

    #[test]
    fn test_face_buttons_map_per_hand() {
        let mut sampler = InputSampler::default();
        let raw = xr(vec![
            controller(Handedness::Right, (0.0, 0.0), &[BUTTON_PRIMARY]),
            controller(Handedness::Left, (0.0, 0.0), &[BUTTON_SECONDARY]),
        ]);
        let frame = sampler.sample(0.016, &raw, SampleContext::default());

        assert!(frame.events.contains(&InputEvent::NextImage));
        assert!(frame.events.contains(&InputEvent::MenuToggle));
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn test_untracked_controller_is_skipped_and_rearmed() {
        let mut sampler = InputSampler::default();
        let pressed = xr(vec![controller(Handedness::Right, (0.0, 0.0), &[BUTTON_PRIMARY])]);
        let gone = xr(vec![]);

        assert_eq!(sampler.sample(0.016, &pressed, SampleContext::default()).events.len(), 1);
        let frame = sampler.sample(0.016, &gone, SampleContext::default());
        assert!(frame.events.is_empty());
        assert_eq!(frame.snapshot.clutch_hand, None);
        // Tracking resumes with the button still down: counts as a new press
        assert_eq!(sampler.sample(0.016, &pressed, SampleContext::default()).events.len(), 1);
    }

    #[test]
    fn test_grip_held_through_tracking_dropout() {
        let mut sampler = InputSampler::default();
        let gripping = xr(vec![controller(Handedness::Right, (0.0, 0.0), &[BUTTON_SQUEEZE])]);

        assert!(sampler.sample(0.016, &gripping, SampleContext::default()).snapshot.buttons.grip);

        let lost = sampler.sample(0.016, &xr(vec![]), SampleContext::default());
        assert!(lost.snapshot.buttons.grip);
        assert_eq!(lost.snapshot.clutch_hand, None);

        // Released while tracked, then lost: stays released
        let open = xr(vec![controller(Handedness::Right, (0.0, 0.0), &[])]);
        assert!(!sampler.sample(0.016, &open, SampleContext::default()).snapshot.buttons.grip);
        assert!(!sampler.sample(0.016, &xr(vec![]), SampleContext::default()).snapshot.buttons.grip);

        // Leaving the XR session drops the held grip
        sampler.sample(0.016, &gripping, SampleContext::default());
        assert!(!sampler.sample(0.016, &RawInput::default(), SampleContext::default()).snapshot.buttons.grip);
    }

    #[test]
    fn test_menu_scroll_from_stick_and_wheel() {
        let mut sampler = InputSampler::default();
        let mut raw = xr(vec![controller(Handedness::Right, (0.0, 1.0), &[])]);
        raw.mouse.wheel = 2.0;

        let frame = sampler.sample(
            0.5,
            &raw,
            SampleContext {
                menu_visible: true,
                ..Default::default()
            },
        );
        // 1.0 * 1.5 * 0.5 + 2.0 * 0.1
        match frame.events.as_slice() {
            [InputEvent::MenuScroll(amount)] => assert!((amount - 0.95).abs() < 1e-5),
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_mouse_click_selects() {
        let mut sampler = InputSampler::default();
        let mut raw = RawInput::default();
        raw.mouse.primary_down = true;

        let frame = sampler.sample(0.016, &raw, SampleContext::default());
        assert_eq!(frame.events, vec![InputEvent::MenuItemSelect]);
        assert!(frame.snapshot.buttons.trigger);
    }
}
