//! Ledge Runner - a tile-based 2D platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collision resolution, camera)
//! - `input`: Keyboard/controller sources producing per-tick intent
//! - `animation`: Frame-timed animation playback
//! - `level`: World descriptions (demo, JSON, procedural)
//! - `settings`: User preferences persisted as JSON
//! - `tuning`: Data-driven movement and camera balance

pub mod animation;
pub mod input;
pub mod level;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use level::{LevelDesc, LevelError};
pub use settings::{Settings, SettingsError};
pub use tuning::{CameraTuning, MovementTuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the simulation will accept (stalled frames are clamped)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player defaults
    pub const PLAYER_SPAWN: (f32, f32) = (50.0, 50.0);
    pub const PLAYER_SIZE: (f32, f32) = (9.0, 18.0);

    /// Horizontal movement (pixels/s and pixels/s²)
    pub const ACCEL_RATE: f32 = 1600.0;
    pub const MAX_SPEED: f32 = 120.0;
    /// Fraction of max speed shed per second with no input
    pub const FRICTION: f32 = 2.2;

    /// Vertical movement (positive y is down)
    pub const GRAVITY: f32 = 600.0;
    pub const JUMP_SPEED: f32 = -280.0;
    pub const MAX_FALL_SPEED: f32 = 500.0;
    /// Coyote time: seconds a jump is still accepted after leaving the ground
    pub const COYOTE_TIME: f32 = 0.2;

    /// Camera defaults
    pub const PAN_STRENGTH: f32 = 20.0;
    pub const MAX_LOOK_AHEAD: f32 = 150.0;
    /// Fraction of the remaining look-ahead distance closed per tick
    pub const LOOK_AHEAD_BLEND: f32 = 0.05;
    pub const CAMERA_TARGET_OFFSET: (f32, f32) = (0.0, -50.0);

    /// Display defaults
    pub const PIXEL_SCALE: u32 = 5;
    pub const TARGET_FPS: u32 = 120;
}

/// Move `current` toward zero by `amount` without crossing it
#[inline]
pub fn approach_zero(current: f32, amount: f32) -> f32 {
    if current > 0.0 {
        (current - amount).max(0.0)
    } else if current < 0.0 {
        (current + amount).min(0.0)
    } else {
        0.0
    }
}

/// True if both components are finite (not NaN or infinite)
#[inline]
pub fn is_finite_vec(v: glam::Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
