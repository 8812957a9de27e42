//! Navigation engine
//!
//! Consumes one [`InputSnapshot`] per frame and moves the player rig. The
//! engine owns the only long-lived navigation state: position, heading,
//! desktop camera pitch and the clutch anchors.

pub mod clutch;
pub mod desktop;
pub mod xr;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::{ButtonEdgeTracker, InputSnapshot};
use crate::spatial::YawPose;

pub use clutch::ClutchAnchor;

/// Which input path drives the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    #[default]
    Desktop,
    Xr,
}

impl std::fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationMode::Desktop => write!(f, "desktop"),
            NavigationMode::Xr => write!(f, "xr"),
        }
    }
}

/// Tuning for the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationSettings {
    /// Metres per second
    pub move_speed: f32,
    /// Radians per second
    pub rotation_speed: f32,
    pub dead_zone: f32,
    /// Fraction of the remaining clutch distance covered each frame
    pub clutch_smoothing: f32,
    /// Radians per pixel of mouse drag
    pub mouse_sensitivity: f32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            rotation_speed: 1.5,
            dead_zone: crate::input::analog::DEFAULT_DEAD_ZONE,
            clutch_smoothing: 0.2,
            mouse_sensitivity: 0.003,
        }
    }
}

/// Player rig state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavigationState {
    pub position: Vec3,
    pub yaw: f32,
    /// Desktop camera pitch, within ±π/2
    pub pitch: f32,
    pub clutch: Option<ClutchAnchor>,
}

impl NavigationState {
    pub fn is_clutching(&self) -> bool {
        self.clutch.is_some()
    }

    pub fn pose(&self) -> YawPose {
        YawPose::new(self.position, self.yaw)
    }
}

/// What one `advance` did to the rig
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    pub position_delta: Vec3,
    pub yaw_delta: f32,
}

impl Motion {
    pub fn is_zero(&self) -> bool {
        self.position_delta == Vec3::ZERO && self.yaw_delta == 0.0
    }
}

/// Frame-driven navigation engine
#[derive(Debug, Clone)]
pub struct NavigationEngine {
    settings: NavigationSettings,
    state: NavigationState,
    grip: ButtonEdgeTracker,
}

impl NavigationEngine {
    pub fn new(settings: NavigationSettings, start: YawPose) -> Self {
        Self {
            settings,
            state: NavigationState {
                position: start.position,
                yaw: start.yaw,
                ..Default::default()
            },
            grip: ButtonEdgeTracker::new(),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn pose(&self) -> YawPose {
        self.state.pose()
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    /// Swap tuning; position, heading and an active clutch are kept
    pub fn set_settings(&mut self, settings: NavigationSettings) {
        self.settings = settings;
    }

    /// Drop any clutch in progress; the next grip press grabs again
    pub fn cancel_clutch(&mut self) {
        if self.state.clutch.take().is_some() {
            debug!("Clutch cancelled");
        }
        self.grip.reset();
    }

    /// Advance the rig by one frame and return the applied motion
    pub fn advance(&mut self, dt: f32, snapshot: &InputSnapshot, mode: NavigationMode) -> Motion {
        let before = self.state.pose();

        match mode {
            NavigationMode::Desktop => {
                self.cancel_clutch();
                let motion = desktop::motion(dt, snapshot, before, &self.settings);
                self.state.pitch = desktop::pitch_after_drag(
                    self.state.pitch,
                    snapshot.mouse_drag.y,
                    self.settings.mouse_sensitivity,
                );
                self.apply(motion);
            }
            NavigationMode::Xr => {
                self.update_clutch(snapshot);
                let motion = xr::stick_motion(dt, &snapshot.axes, before, &self.settings, self.state.is_clutching());
                self.apply(motion);
            }
        }

        Motion {
            position_delta: self.state.position - before.position,
            yaw_delta: self.state.yaw - before.yaw,
        }
    }

    fn apply(&mut self, motion: Motion) {
        self.state.position += motion.position_delta;
        self.state.yaw += motion.yaw_delta;
    }

    fn update_clutch(&mut self, snapshot: &InputSnapshot) {
        let pressed_edge = self.grip.update(snapshot.buttons.grip);

        if !snapshot.buttons.grip {
            if self.state.clutch.take().is_some() {
                debug!("Clutch released at {:?}", self.state.position);
            }
            return;
        }

        // Hand untracked this frame: keep the anchors, skip the pull
        let Some(hand) = snapshot.clutch_hand else {
            return;
        };

        if pressed_edge {
            let anchor = ClutchAnchor::grab(self.state.pose(), hand);
            debug!("Clutch grabbed at {:?}", anchor.controller_world());
            self.state.clutch = Some(anchor);
        }

        if let Some(anchor) = self.state.clutch {
            let target = anchor.target(hand);
            self.state.position = clutch::approach(self.state.position, target, self.settings.clutch_smoothing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    fn grip_at(hand: Vec3) -> InputSnapshot {
        let mut snapshot = InputSnapshot {
            clutch_hand: Some(hand),
            ..Default::default()
        };
        snapshot.buttons.grip = true;
        snapshot
    }

    #[test]
    fn test_desktop_forward() {
        let mut engine = NavigationEngine::new(NavigationSettings::default(), YawPose::default());
        let snapshot = InputSnapshot {
            keys: [Key::W].into_iter().collect(),
            ..Default::default()
        };
        let motion = engine.advance(0.5, &snapshot, NavigationMode::Desktop);
        assert!((motion.position_delta - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert!((engine.state().position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_clutch_grab_drag_release() {
        let settings = NavigationSettings {
            clutch_smoothing: 0.5,
            ..Default::default()
        };
        let mut engine = NavigationEngine::new(settings, YawPose::default());
        let hand = Vec3::new(0.2, 1.0, -0.4);

        // Press: anchors captured, no motion yet
        let motion = engine.advance(0.016, &grip_at(hand), NavigationMode::Xr);
        assert!(motion.is_zero());
        assert!(engine.state().is_clutching());

        // Pull the hand 1 m toward the body: target is 1 m forward
        let pulled = hand + Vec3::new(0.0, 0.0, 1.0);
        engine.advance(0.016, &grip_at(pulled), NavigationMode::Xr);
        assert!((engine.state().position - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-5);
        engine.advance(0.016, &grip_at(pulled), NavigationMode::Xr);
        assert!((engine.state().position - Vec3::new(0.0, 0.0, -0.75)).length() < 1e-5);

        // Release: the player stays where it is
        let released = engine.advance(0.016, &InputSnapshot::default(), NavigationMode::Xr);
        assert!(released.is_zero());
        assert!(!engine.state().is_clutching());
        assert!((engine.state().position - Vec3::new(0.0, 0.0, -0.75)).length() < 1e-5);
    }

    #[test]
    fn test_clutch_suppresses_stick_translation() {
        let mut engine = NavigationEngine::new(NavigationSettings::default(), YawPose::default());
        let hand = Vec3::new(0.2, 1.0, -0.4);
        engine.advance(0.016, &grip_at(hand), NavigationMode::Xr);

        let mut snapshot = grip_at(hand);
        snapshot.axes.vertical = -1.0;
        let motion = engine.advance(0.1, &snapshot, NavigationMode::Xr);
        assert!(motion.position_delta.length() < 1e-6);
    }

    #[test]
    fn test_clutch_holds_while_hand_untracked() {
        let mut engine = NavigationEngine::new(NavigationSettings::default(), YawPose::default());
        engine.advance(0.016, &grip_at(Vec3::ZERO), NavigationMode::Xr);

        let mut lost = InputSnapshot::default();
        lost.buttons.grip = true;
        let motion = engine.advance(0.016, &lost, NavigationMode::Xr);
        assert!(motion.is_zero());
        assert!(engine.state().is_clutching());
    }

    #[test]
    fn test_desktop_mode_drops_clutch() {
        let mut engine = NavigationEngine::new(NavigationSettings::default(), YawPose::default());
        engine.advance(0.016, &grip_at(Vec3::ZERO), NavigationMode::Xr);
        engine.advance(0.016, &InputSnapshot::default(), NavigationMode::Desktop);
        assert!(!engine.state().is_clutching());
    }

    #[test]
    fn test_xr_stick_turn() {
        let mut engine = NavigationEngine::new(NavigationSettings::default(), YawPose::default());
        let mut snapshot = InputSnapshot::default();
        snapshot.axes.turn = -1.0;
        let motion = engine.advance(1.0, &snapshot, NavigationMode::Xr);
        assert!((motion.yaw_delta - 1.5).abs() < 1e-6);
        assert!((engine.state().yaw - 1.5).abs() < 1e-6);
    }
}
