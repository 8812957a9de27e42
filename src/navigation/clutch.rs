//! Clutch (grab-the-world) movement
//!
//! While the grip is held, the player is pulled opposite to the hand's motion
//! since the press. Controller positions are resolved against the rig pose
//! frozen at grab time, so the player moving underneath the hand does not
//! feed back into the target.

use glam::Vec3;

use crate::spatial::YawPose;

/// Anchors captured on the grip-press edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClutchAnchor {
    /// Rig pose at grab; also the player's anchor position
    rig: YawPose,
    /// Controller world position at grab
    controller_world: Vec3,
}

impl ClutchAnchor {
    /// Capture anchors from the current rig pose and tracking-space grip position
    pub fn grab(rig: YawPose, controller_local: Vec3) -> Self {
        Self {
            rig,
            controller_world: rig.to_world(controller_local),
        }
    }

    pub fn player_world(&self) -> Vec3 {
        self.rig.position
    }

    pub fn controller_world(&self) -> Vec3 {
        self.controller_world
    }

    /// Where the player should end up for the hand's current tracking-space position
    pub fn target(&self, controller_local: Vec3) -> Vec3 {
        let current = self.rig.to_world(controller_local);
        self.player_world() + (self.controller_world - current)
    }
}

/// Linear step of `position` toward `target` by `smoothing` (in (0, 1])
pub fn approach(position: Vec3, target: Vec3, smoothing: f32) -> Vec3 {
    position + (target - position) * smoothing.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_target_is_opposite_to_hand_motion() {
        let anchor = ClutchAnchor::grab(YawPose::new(Vec3::new(0.0, 0.0, 5.0), 0.0), Vec3::new(0.2, 1.0, -0.3));
        // Pull the hand 0.5 m toward the body (+Z)
        let target = anchor.target(Vec3::new(0.2, 1.0, 0.2));
        assert!((target - Vec3::new(0.0, 0.0, 4.5)).length() < 1e-5);
    }

    #[test]
    fn test_target_follows_rig_heading_at_grab() {
        // Facing -X: a hand pulled back along local +Z moves along world +X
        let anchor = ClutchAnchor::grab(YawPose::new(Vec3::ZERO, FRAC_PI_2), Vec3::ZERO);
        let target = anchor.target(Vec3::new(0.0, 0.0, 1.0));
        assert!((target - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_approach_full_smoothing_snaps() {
        assert_eq!(approach(Vec3::ZERO, Vec3::ONE, 1.0), Vec3::ONE);
    }

    proptest! {
        #[test]
        fn clutch_converges_without_overshoot(
            dx in -2.0f32..2.0,
            dz in -2.0f32..2.0,
            smoothing in 0.05f32..1.0,
            frames in 1usize..120,
        ) {
            let start = Vec3::new(1.0, 0.0, -1.0);
            let hand = Vec3::new(0.2, 1.1, -0.3);
            let anchor = ClutchAnchor::grab(YawPose::new(start, 0.0), hand);
            let moved = hand + Vec3::new(dx, 0.0, dz);
            let target = anchor.target(moved);

            let mut position = start;
            for _ in 0..frames {
                position = approach(position, target, smoothing);
            }

            let displacement = position - start;
            let full = -Vec3::new(dx, 0.0, dz);
            let expected = full * (1.0 - (1.0 - smoothing).powi(frames as i32));
            prop_assert!((displacement - expected).length() < 1e-3);
            prop_assert!(displacement.length() <= full.length() + 1e-4);
        }
    }
}
