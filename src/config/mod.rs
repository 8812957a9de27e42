//! Configuration management for the gallery host
//!
//! Handles loading, parsing, validating and hot-reloading of the YAML
//! configuration file. Every field has a default, so an empty file (or a
//! missing section) is a valid configuration.

pub mod watcher;

use std::str::FromStr;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::ConfigError;
use crate::input::{Handedness, SamplerSettings};
use crate::menu::MenuSettings;
use crate::navigation::{NavigationMode, NavigationSettings};
use crate::spatial::YawPose;

pub use watcher::ConfigWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub host: HostConfig,
}

/// Content location and circle layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GalleryConfig {
    /// Directory holding one folder per gallery
    #[serde(default = "default_root")]
    pub root: String,
    /// Catalog JSON; when absent every folder under `root` is a gallery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    /// Gallery loaded at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_painting_height")]
    pub painting_height: f32,
}

/// Movement tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NavigationConfig {
    #[serde(default)]
    pub mode: NavigationMode,
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f32,
    #[serde(default = "default_clutch_smoothing")]
    pub clutch_smoothing: f32,
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,
    #[serde(default = "default_movement_hand")]
    pub movement_hand: Handedness,
    #[serde(default)]
    pub start_position: Vec3,
    #[serde(default)]
    pub start_yaw: f32,
}

/// Menu panel geometry and scrolling
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MenuConfig {
    #[serde(default = "default_item_height")]
    pub item_height: f32,
    #[serde(default = "default_item_width")]
    pub item_width: f32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f32,
    #[serde(default = "default_panel_distance")]
    pub panel_distance: f32,
    #[serde(default = "default_panel_height")]
    pub panel_height: f32,
    /// Panel units per second at full stick deflection
    #[serde(default = "default_menu_scroll_speed")]
    pub scroll_speed: f32,
    /// Panel units per mouse wheel line
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f32,
}

/// In-world console
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_console_capacity")]
    pub capacity: usize,
    #[serde(default = "default_visible_lines")]
    pub visible_lines: usize,
    /// Lines per second at full stick deflection
    #[serde(default = "default_console_scroll_speed")]
    pub scroll_speed: f32,
    /// Lowest level mirrored into the console
    #[serde(default = "default_console_level")]
    pub level: String,
}

/// Frame loop
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HostConfig {
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::from_yaml(&contents).with_context(|| format!("Invalid config file: {}", path))
    }

    /// Parse and validate YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document parses as null
        let config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate ranges of every tuning value
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::new(field, value, "must be a positive number"))
            }
        }

        positive("gallery.radius", self.gallery.radius)?;
        positive("gallery.painting_height", self.gallery.painting_height)?;

        let nav = &self.navigation;
        positive("navigation.move_speed", nav.move_speed)?;
        positive("navigation.rotation_speed", nav.rotation_speed)?;
        positive("navigation.mouse_sensitivity", nav.mouse_sensitivity)?;
        if !(0.0..1.0).contains(&nav.dead_zone) {
            return Err(ConfigError::new("navigation.dead_zone", nav.dead_zone, "must be in [0, 1)"));
        }
        if !(nav.clutch_smoothing > 0.0 && nav.clutch_smoothing <= 1.0) {
            return Err(ConfigError::new(
                "navigation.clutch_smoothing",
                nav.clutch_smoothing,
                "must be in (0, 1]",
            ));
        }
        if !nav.start_position.is_finite() || !nav.start_yaw.is_finite() {
            return Err(ConfigError::new(
                "navigation.start_position",
                format!("{:?}", nav.start_position),
                "must be finite",
            ));
        }

        let menu = &self.menu;
        positive("menu.item_height", menu.item_height)?;
        positive("menu.item_width", menu.item_width)?;
        positive("menu.viewport_height", menu.viewport_height)?;
        positive("menu.panel_distance", menu.panel_distance)?;
        positive("menu.scroll_speed", menu.scroll_speed)?;
        positive("menu.wheel_step", menu.wheel_step)?;
        if !menu.panel_height.is_finite() {
            return Err(ConfigError::new("menu.panel_height", menu.panel_height, "must be finite"));
        }

        if self.console.capacity == 0 {
            return Err(ConfigError::new("console.capacity", 0, "must be at least 1"));
        }
        if self.console.visible_lines == 0 {
            return Err(ConfigError::new("console.visible_lines", 0, "must be at least 1"));
        }
        positive("console.scroll_speed", self.console.scroll_speed)?;
        if tracing::Level::from_str(&self.console.level).is_err() {
            return Err(ConfigError::new(
                "console.level",
                &self.console.level,
                "must be one of error, warn, info, debug, trace",
            ));
        }

        if !(1..=240).contains(&self.host.tick_hz) {
            return Err(ConfigError::new("host.tick_hz", self.host.tick_hz, "must be in 1..=240"));
        }

        Ok(())
    }

    pub fn navigation_settings(&self) -> NavigationSettings {
        NavigationSettings {
            move_speed: self.navigation.move_speed,
            rotation_speed: self.navigation.rotation_speed,
            dead_zone: self.navigation.dead_zone,
            clutch_smoothing: self.navigation.clutch_smoothing,
            mouse_sensitivity: self.navigation.mouse_sensitivity,
        }
    }

    pub fn sampler_settings(&self) -> SamplerSettings {
        SamplerSettings {
            dead_zone: self.navigation.dead_zone,
            movement_hand: self.navigation.movement_hand,
            menu_scroll_speed: self.menu.scroll_speed,
            wheel_step: self.menu.wheel_step,
            console_scroll_speed: self.console.scroll_speed,
        }
    }

    pub fn menu_settings(&self) -> MenuSettings {
        MenuSettings {
            item_height: self.menu.item_height,
            item_width: self.menu.item_width,
            viewport_height: self.menu.viewport_height,
            panel_distance: self.menu.panel_distance,
            panel_height: self.menu.panel_height,
        }
    }

    pub fn start_pose(&self) -> YawPose {
        YawPose::new(self.navigation.start_position, self.navigation.start_yaw)
    }
}

impl ConsoleConfig {
    pub fn min_level(&self) -> tracing::Level {
        tracing::Level::from_str(&self.level).unwrap_or(tracing::Level::INFO)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            catalog: None,
            initial: None,
            radius: default_radius(),
            painting_height: default_painting_height(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            mode: NavigationMode::default(),
            move_speed: default_move_speed(),
            rotation_speed: default_rotation_speed(),
            dead_zone: default_dead_zone(),
            clutch_smoothing: default_clutch_smoothing(),
            mouse_sensitivity: default_mouse_sensitivity(),
            movement_hand: default_movement_hand(),
            start_position: Vec3::ZERO,
            start_yaw: 0.0,
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            item_height: default_item_height(),
            item_width: default_item_width(),
            viewport_height: default_viewport_height(),
            panel_distance: default_panel_distance(),
            panel_height: default_panel_height(),
            scroll_speed: default_menu_scroll_speed(),
            wheel_step: default_wheel_step(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            capacity: default_console_capacity(),
            visible_lines: default_visible_lines(),
            scroll_speed: default_console_scroll_speed(),
            level: default_console_level(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_hz: default_tick_hz(),
        }
    }
}

fn default_root() -> String { "content".to_string() }
fn default_radius() -> f32 { 5.0 }
fn default_painting_height() -> f32 { 1.6 }
fn default_move_speed() -> f32 { 2.0 }
fn default_rotation_speed() -> f32 { 1.5 }
fn default_dead_zone() -> f32 { crate::input::analog::DEFAULT_DEAD_ZONE }
fn default_clutch_smoothing() -> f32 { 0.2 }
fn default_mouse_sensitivity() -> f32 { 0.003 }
fn default_movement_hand() -> Handedness { Handedness::Right }
fn default_item_height() -> f32 { 0.12 }
fn default_item_width() -> f32 { 0.8 }
fn default_viewport_height() -> f32 { 0.96 }
fn default_panel_distance() -> f32 { 1.5 }
fn default_panel_height() -> f32 { 1.4 }
fn default_menu_scroll_speed() -> f32 { 1.5 }
fn default_wheel_step() -> f32 { 0.1 }
fn default_console_capacity() -> usize { 500 }
fn default_visible_lines() -> usize { 12 }
fn default_console_scroll_speed() -> f32 { 12.0 }
fn default_console_level() -> String { "info".to_string() }
fn default_tick_hz() -> u32 { 72 }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.navigation_settings(), NavigationSettings::default());
        assert_eq!(config.sampler_settings(), SamplerSettings::default());
        assert_eq!(config.menu_settings(), MenuSettings::default());
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
navigation:
  mode: xr
  movement_hand: left
  start_position: [0.0, 0.0, 2.5]
menu:
  item_height: 0.2
host:
  tick_hz: 90
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.navigation.mode, NavigationMode::Xr);
        assert_eq!(config.navigation.movement_hand, Handedness::Left);
        assert_eq!(config.start_pose().position, Vec3::new(0.0, 0.0, 2.5));
        assert_eq!(config.menu.item_height, 0.2);
        assert_eq!(config.menu.item_width, default_item_width());
        assert_eq!(config.host.tick_hz, 90);
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let cases = [
            ("navigation:\n  dead_zone: 1.0\n", "navigation.dead_zone"),
            ("navigation:\n  clutch_smoothing: 0.0\n", "navigation.clutch_smoothing"),
            ("navigation:\n  move_speed: -1.0\n", "navigation.move_speed"),
            ("menu:\n  viewport_height: 0.0\n", "menu.viewport_height"),
            ("console:\n  level: loud\n", "console.level"),
            ("host:\n  tick_hz: 0\n", "host.tick_hz"),
        ];
        for (yaml, field) in cases {
            let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
            let err = config.validate().unwrap_err();
            assert_eq!(err.field, field, "for {}", yaml.trim());
            assert!(AppConfig::from_yaml(yaml).is_err());
        }
    }

    #[tokio::test]
    async fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.yaml");
        let path = path.to_string_lossy().to_string();

        let mut config = AppConfig::default();
        config.gallery.initial = Some("Zeta".to_string());
        config.console.visible_lines = 20;
        config.save(&path).await?;

        let loaded = AppConfig::load(&path).await?;
        assert_eq!(loaded.gallery.initial.as_deref(), Some("Zeta"));
        assert_eq!(loaded.console.visible_lines, 20);
        assert_eq!(loaded.navigation.mode, NavigationMode::Desktop);
        assert_eq!(loaded.host.tick_hz, config.host.tick_hz);
        Ok(())
    }
}
