//! Keyboard and mouse navigation

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::{Motion, NavigationSettings};
use crate::input::{InputSnapshot, Key};
use crate::spatial::YawPose;

const FORWARD: &[Key] = &[Key::W, Key::ArrowUp];
const BACK: &[Key] = &[Key::S, Key::ArrowDown];
const TURN_LEFT: &[Key] = &[Key::Q, Key::ArrowLeft];
const TURN_RIGHT: &[Key] = &[Key::E, Key::ArrowRight];

/// Motion for one desktop frame, relative to the current heading
pub fn motion(dt: f32, snapshot: &InputSnapshot, pose: YawPose, settings: &NavigationSettings) -> Motion {
    let step = settings.move_speed * dt;
    let forward = snapshot.key_axis(FORWARD, BACK);
    let strafe = snapshot.key_axis(&[Key::D], &[Key::A]);
    let lift = snapshot.key_axis(&[Key::R], &[Key::F]);
    let turn = snapshot.key_axis(TURN_LEFT, TURN_RIGHT);

    let position_delta = (pose.forward() * forward + pose.right() * strafe) * step + Vec3::Y * lift * step;
    let yaw_delta = turn * settings.rotation_speed * dt - snapshot.mouse_drag.x * settings.mouse_sensitivity;

    Motion {
        position_delta,
        yaw_delta,
    }
}

/// Camera pitch after a vertical mouse drag, clamped to straight up/down
pub fn pitch_after_drag(pitch: f32, drag_y: f32, sensitivity: f32) -> f32 {
    (pitch - drag_y * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2)
}
