//! Thumbstick locomotion for XR mode

use glam::Vec3;

use super::{Motion, NavigationSettings};
use crate::input::analog::apply_dead_zone;
use crate::input::Axes;
use crate::spatial::YawPose;

/// Stick motion for one frame
///
/// Stick Y moves along the heading (pushed forward is negative), stick X
/// turns (right turns right). Translation is dropped while clutching.
pub fn stick_motion(dt: f32, axes: &Axes, pose: YawPose, settings: &NavigationSettings, clutching: bool) -> Motion {
    let turn = apply_dead_zone(axes.turn, settings.dead_zone);
    let vertical = apply_dead_zone(axes.vertical, settings.dead_zone);

    let position_delta = if clutching {
        Vec3::ZERO
    } else {
        pose.forward() * (-vertical) * settings.move_speed * dt
    };

    Motion {
        position_delta,
        yaw_delta: -turn * settings.rotation_speed * dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_stick_forward_moves_forward() {
        let settings = NavigationSettings::default();
        let axes = Axes {
            vertical: -1.0,
            ..Default::default()
        };
        let m = stick_motion(1.0, &axes, YawPose::default(), &settings, false);
        assert!((m.position_delta - Vec3::NEG_Z * settings.move_speed).length() < 1e-5);
    }

    #[test]
    fn test_stick_right_turns_right() {
        let axes = Axes {
            turn: 1.0,
            ..Default::default()
        };
        let m = stick_motion(0.1, &axes, YawPose::default(), &NavigationSettings::default(), false);
        assert!(m.yaw_delta < 0.0);
    }

    #[test]
    fn test_clutch_suppresses_translation_only() {
        let axes = Axes {
            turn: 1.0,
            vertical: -1.0,
            ..Default::default()
        };
        let m = stick_motion(0.1, &axes, YawPose::default(), &NavigationSettings::default(), true);
        assert_eq!(m.position_delta, Vec3::ZERO);
        assert!(m.yaw_delta != 0.0);
    }

    proptest! {
        #[test]
        fn dead_zone_gives_zero_motion(turn in -0.2f32..=0.2, vertical in -0.2f32..=0.2, yaw in -6.3f32..6.3) {
            let axes = Axes { turn, vertical, ..Default::default() };
            let m = stick_motion(0.016, &axes, YawPose::new(Vec3::ZERO, yaw), &NavigationSettings::default(), false);
            prop_assert_eq!(m.position_delta, Vec3::ZERO);
            prop_assert_eq!(m.yaw_delta, 0.0);
        }
    }
}
