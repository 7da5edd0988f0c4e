//! Game settings and preferences
//!
//! Persisted as a JSON file next to the executable (or wherever the host
//! points it). A missing or broken file falls back to defaults.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PIXEL_SCALE, TARGET_FPS};
use crate::tuning::{CameraTuning, MovementTuning};

/// Errors raised by settings persistence
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "I/O error: {e}"),
            SettingsError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Json(e)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    /// Window resolution in physical pixels
    pub resolution: (u32, u32),
    /// Integer upscale from the world surface to the window
    pub scale: u32,
    /// Render rate the host aims for
    pub target_fps: u32,

    // === Input ===
    /// Analog stick values below this magnitude read as zero
    pub controller_deadzone: f32,

    // === Tuning ===
    pub movement: MovementTuning,
    pub camera: CameraTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: (1600, 900),
            scale: PIXEL_SCALE,
            target_fps: TARGET_FPS,
            controller_deadzone: 0.1,
            movement: MovementTuning::default(),
            camera: CameraTuning::default(),
        }
    }
}

impl Settings {
    pub fn width(&self) -> u32 {
        self.resolution.0
    }

    pub fn height(&self) -> u32 {
        self.resolution.1
    }

    /// World-space size of the visible area (resolution / scale)
    pub fn viewport_size(&self) -> Vec2 {
        let scale = self.scale.max(1) as f32;
        Vec2::new(self.resolution.0 as f32 / scale, self.resolution.1 as f32 / scale)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, logging and falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.as_ref().display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Error while loading settings: {e}; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("ledge_runner_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_viewport_size_uses_scale() {
        let settings = Settings {
            resolution: (1600, 900),
            scale: 5,
            ..Default::default()
        };
        assert_eq!(settings.viewport_size(), Vec2::new(320.0, 180.0));

        let unscaled = Settings {
            scale: 0,
            ..settings
        };
        assert_eq!(unscaled.viewport_size(), Vec2::new(1600.0, 900.0));
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("settings_roundtrip");
        let mut settings = Settings::default();
        settings.target_fps = 60;
        settings.camera.look_ahead = false;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = temp_path("settings_missing");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(Settings::load(&path), Err(SettingsError::Io(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let path = temp_path("settings_corrupt");
        std::fs::write(&path, "{ this is not json").unwrap();
        assert!(matches!(Settings::load(&path), Err(SettingsError::Json(_))));
        assert_eq!(Settings::load_or_default(&path), Settings::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"scale": 3}"#).unwrap();
        assert_eq!(settings.scale, 3);
        assert_eq!(settings.target_fps, TARGET_FPS);
        assert_eq!(settings.movement, MovementTuning::default());
    }
}
