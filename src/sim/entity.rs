//! Kinematic entities: velocity integration, grounding and animation state
//!
//! Per tick, in order: jump, horizontal acceleration, friction, facing,
//! gravity and landing, coyote timer, collision resolution, animation state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AxisAlignedBody, MovableBody, Rect};
use super::collision::{CollisionFlags, resolve};
use super::tilemap::ObstacleQuery;
use super::timer::Timer;
use crate::approach_zero;
use crate::is_finite_vec;
use crate::tuning::MovementTuning;

/// Normalized horizontal input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalIntent {
    Left,
    #[default]
    None,
    Right,
}

impl HorizontalIntent {
    /// -1, 0 or 1
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            HorizontalIntent::Left => -1.0,
            HorizontalIntent::None => 0.0,
            HorizontalIntent::Right => 1.0,
        }
    }

    /// Quantize an analog axis (already dead-zoned) to a direction
    pub fn from_axis(value: f32) -> Self {
        if value < 0.0 {
            HorizontalIntent::Left
        } else if value > 0.0 {
            HorizontalIntent::Right
        } else {
            HorizontalIntent::None
        }
    }

    /// Combine two held digital directions; holding both cancels out
    pub fn from_held(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => HorizontalIntent::Left,
            (false, true) => HorizontalIntent::Right,
            _ => HorizontalIntent::None,
        }
    }
}

/// Animation tag derived from kinematic state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Run,
    Jump,
}

impl AnimationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Run => "run",
            AnimationState::Jump => "jump",
        }
    }
}

/// A moving body with platformer physics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicEntity {
    pub id: u32,
    /// Asset tag (animations are looked up as "<tag>/<action>")
    pub tag: String,
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    /// Sides blocked during the most recent resolution only
    pub collisions: CollisionFlags,
    pub tuning: MovementTuning,
    pub is_grounded: bool,
    /// Coyote-time window, restarted every tick the entity stands on ground
    pub air_timer: Timer,
    /// Horizontal input applied on the last tick
    pub direction: HorizontalIntent,
    /// Facing left (sprite mirrored)
    pub flip: bool,
    pub animation: AnimationState,
    /// Last position known to be finite, restored if the state is corrupted
    #[serde(skip)]
    last_good_position: Vec2,
}

impl KinematicEntity {
    pub fn new(id: u32, tag: impl Into<String>, position: Vec2, size: Vec2, tuning: MovementTuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            id,
            tag: tag.into(),
            position,
            size: size.max(Vec2::ZERO),
            velocity: Vec2::ZERO,
            collisions: CollisionFlags::NONE,
            tuning,
            is_grounded: false,
            air_timer: Timer::new(tuning.coyote_time),
            direction: HorizontalIntent::None,
            flip: false,
            animation: AnimationState::Jump,
            last_good_position: position,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// True while a jump request would be honoured
    pub fn can_jump(&self) -> bool {
        self.is_grounded
    }

    /// "<tag>/<action>" key for the current animation
    pub fn action_key(&self) -> String {
        format!("{}/{}", self.tag, self.animation.as_str())
    }

    /// Advance one physics step. Non-positive or non-finite `dt` is a no-op.
    pub fn tick<O>(&mut self, dt: f32, intent: HorizontalIntent, jump_requested: bool, obstacles: &O)
    where
        O: ObstacleQuery + ?Sized,
    {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if !self.state_is_finite() {
            self.recover_from_corruption();
            return;
        }

        let t = self.tuning;

        // Jump (a jump this tick overrides last tick's landing)
        let mut jumped = false;
        if jump_requested && self.is_grounded {
            self.velocity.y = t.jump_speed;
            self.is_grounded = false;
            jumped = true;
            log::debug!("Entity {} jumped from {:?}", self.id, self.position);
        }

        // Horizontal acceleration
        self.velocity.x += intent.sign() * t.accel_rate * dt;
        self.velocity.x = self.velocity.x.clamp(-t.max_speed, t.max_speed);

        // Friction, never past zero
        if intent == HorizontalIntent::None {
            self.velocity.x = approach_zero(self.velocity.x, t.friction * t.max_speed * dt);
        }

        // Facing
        match intent {
            HorizontalIntent::Left => self.flip = true,
            HorizontalIntent::Right => self.flip = false,
            HorizontalIntent::None => {}
        }
        self.direction = intent;

        // Landing and gravity
        if self.collisions.bottom && !jumped {
            if !self.is_grounded {
                log::debug!("Entity {} landed at y={}", self.id, self.position.y);
            }
            self.velocity.y = 0.0;
            self.is_grounded = true;
            self.air_timer.restart();
        }
        self.velocity.y += t.gravity * dt;
        self.velocity.y = self.velocity.y.clamp(-t.max_fall_speed, t.max_fall_speed);

        // Coyote time
        self.air_timer.update(dt);
        if self.air_timer.completed() {
            self.is_grounded = false;
        }

        // Collision resolution
        let resolution = resolve(&self.body(), self.velocity, dt, obstacles);
        self.position = resolution.position;
        self.collisions = resolution.flags;
        if resolution.flags.horizontal() {
            self.velocity.x = 0.0;
        }
        if resolution.flags.vertical() {
            self.velocity.y = 0.0;
        }

        self.animation = self.derive_animation();
        self.last_good_position = self.position;
    }

    /// Pure function of the current state
    pub fn derive_animation(&self) -> AnimationState {
        if !self.is_grounded {
            AnimationState::Jump
        } else if self.direction != HorizontalIntent::None {
            AnimationState::Run
        } else {
            AnimationState::Idle
        }
    }

    fn state_is_finite(&self) -> bool {
        is_finite_vec(self.position) && is_finite_vec(self.velocity)
    }

    fn recover_from_corruption(&mut self) {
        log::error!(
            "Entity {} has non-finite state (pos={:?}, vel={:?}); skipping tick",
            self.id,
            self.position,
            self.velocity
        );
        self.velocity = Vec2::ZERO;
        if !is_finite_vec(self.position) {
            self.position = self.last_good_position;
        }
    }
}

impl MovableBody for KinematicEntity {
    fn body(&self) -> AxisAlignedBody {
        AxisAlignedBody::new(self.position, self.size)
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }
}
