//! Data-driven movement and camera balance
//!
//! Both tables are plain serde structs so they can live inside the settings
//! file or be swapped per level without touching simulation code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Kinematic parameters for a moving entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Horizontal acceleration while input is held (pixels/s²)
    pub accel_rate: f32,
    /// Horizontal speed cap (pixels/s)
    pub max_speed: f32,
    /// Fraction of `max_speed` shed per second with no horizontal input
    pub friction: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_speed: f32,
    /// Vertical speed cap in both directions (pixels/s)
    pub max_fall_speed: f32,
    /// Grace period after leaving the ground during which a jump is accepted
    pub coyote_time: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            accel_rate: ACCEL_RATE,
            max_speed: MAX_SPEED,
            friction: FRICTION,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
            coyote_time: COYOTE_TIME,
        }
    }
}

impl MovementTuning {
    /// Replace non-finite or negative caps with defaults so a bad tuning
    /// file cannot poison the simulation
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let pick = |value: f32, fallback: f32, allow_negative: bool| {
            if value.is_finite() && (allow_negative || value >= 0.0) {
                value
            } else {
                log::warn!("Invalid movement tuning value {value}, using {fallback}");
                fallback
            }
        };
        Self {
            accel_rate: pick(self.accel_rate, defaults.accel_rate, false),
            max_speed: pick(self.max_speed, defaults.max_speed, false),
            friction: pick(self.friction, defaults.friction, false),
            gravity: pick(self.gravity, defaults.gravity, true),
            jump_speed: pick(self.jump_speed, defaults.jump_speed, true),
            max_fall_speed: pick(self.max_fall_speed, defaults.max_fall_speed, false),
            coyote_time: pick(self.coyote_time, defaults.coyote_time, false),
        }
    }
}

/// Camera follow behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// The camera closes 1/pan_strength of the remaining distance per tick
    pub pan_strength: f32,
    /// Bias the view toward the direction of travel
    pub look_ahead: bool,
    /// Largest horizontal look-ahead offset (pixels)
    pub max_look_ahead: f32,
    /// Fraction of the remaining look-ahead distance closed per tick
    pub look_ahead_blend: f32,
    /// Offset added to the target position before centring
    pub target_offset: Vec2,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            pan_strength: PAN_STRENGTH,
            look_ahead: true,
            max_look_ahead: MAX_LOOK_AHEAD,
            look_ahead_blend: LOOK_AHEAD_BLEND,
            target_offset: Vec2::new(CAMERA_TARGET_OFFSET.0, CAMERA_TARGET_OFFSET.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_defaults() {
        let tuning = MovementTuning::default();
        assert_eq!(tuning.max_speed, 120.0);
        assert_eq!(tuning.gravity, 600.0);
        assert_eq!(tuning.jump_speed, -280.0);
        assert_eq!(tuning.coyote_time, 0.2);
    }

    #[test]
    fn test_sanitized_replaces_bad_values() {
        let tuning = MovementTuning {
            max_speed: f32::NAN,
            friction: -1.0,
            jump_speed: -300.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.max_speed, MAX_SPEED);
        assert_eq!(tuning.friction, FRICTION);
        assert_eq!(tuning.jump_speed, -300.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: MovementTuning = serde_json::from_str(r#"{"gravity": 900.0}"#).unwrap();
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.max_speed, MAX_SPEED);

        let camera: CameraTuning = serde_json::from_str(r#"{"look_ahead": false}"#).unwrap();
        assert!(!camera.look_ahead);
        assert_eq!(camera.pan_strength, PAN_STRENGTH);
    }
}
