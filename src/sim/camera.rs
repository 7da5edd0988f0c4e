//! Smoothing follow camera
//!
//! Each tick the scroll closes `1/pan_strength` of the distance to the bound
//! target, so a moving target is always trailed by a lag proportional to
//! `pan_strength`. Horizontal look-ahead shifts the focus toward where the
//! target is heading once it moves faster than half its top speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Rect;
use super::entity::KinematicEntity;
use crate::tuning::CameraTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// World-space origin of the view (floating point, unsnapped)
    pub scroll: Vec2,
    pub viewport_size: Vec2,
    pub tuning: CameraTuning,
    /// Smoothed horizontal look-ahead currently applied
    pub current_look_ahead: f32,
    /// Entity id being followed
    target: Option<u32>,
}

impl Camera {
    pub fn new(viewport_size: Vec2, tuning: CameraTuning) -> Self {
        let mut tuning = tuning;
        // The approach overshoots below 1 and divides by zero at 0
        if !tuning.pan_strength.is_finite() || tuning.pan_strength < 1.0 {
            log::warn!("Camera pan strength {} clamped to 1.0", tuning.pan_strength);
            tuning.pan_strength = 1.0;
        }
        tuning.look_ahead_blend = if tuning.look_ahead_blend.is_finite() {
            tuning.look_ahead_blend.clamp(0.0, 1.0)
        } else {
            CameraTuning::default().look_ahead_blend
        };
        Self {
            scroll: Vec2::ZERO,
            viewport_size,
            tuning,
            current_look_ahead: 0.0,
            target: None,
        }
    }

    /// Follow entity `id` from the next tick on
    pub fn bind(&mut self, id: u32) {
        if self.target != Some(id) {
            log::debug!("Camera bound to entity {id}");
            self.current_look_ahead = 0.0;
        }
        self.target = Some(id);
    }

    /// Stop following; the scroll stays where it is
    pub fn unbind(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn set_target_offset(&mut self, offset: Vec2) {
        self.tuning.target_offset = offset;
    }

    /// Advance one tick toward `target`. Frozen when nothing is bound or
    /// the bound entity is not supplied.
    pub fn tick(&mut self, target: Option<&KinematicEntity>) {
        let Some(bound) = self.target else {
            return;
        };
        let Some(entity) = target.filter(|e| e.id == bound) else {
            return;
        };

        let wanted = if self.tuning.look_ahead {
            self.target_look_ahead(entity.velocity.x, entity.tuning.max_speed)
        } else {
            0.0
        };
        self.current_look_ahead += (wanted - self.current_look_ahead) * self.tuning.look_ahead_blend;

        let focus = self.desired_scroll(entity.position);
        self.scroll += (focus - self.scroll) / self.tuning.pan_strength;
    }

    /// Scroll that would centre `position` (plus offset and current look-ahead)
    pub fn desired_scroll(&self, position: Vec2) -> Vec2 {
        position + self.tuning.target_offset + Vec2::new(self.current_look_ahead, 0.0)
            - self.viewport_size / 2.0
    }

    /// Look-ahead the camera is blending toward for a given horizontal speed.
    /// Zero up to half of `max_speed`, then linear up to `max_look_ahead`.
    pub fn target_look_ahead(&self, velocity_x: f32, max_speed: f32) -> f32 {
        if max_speed <= 0.0 {
            return 0.0;
        }
        let ratio = velocity_x.abs() / max_speed;
        let t = ((ratio - 0.5) / 0.5).clamp(0.0, 1.0);
        velocity_x.signum() * t * self.tuning.max_look_ahead
    }

    /// Jump straight to the target with no smoothing (level start, respawn)
    pub fn snap_to(&mut self, entity: &KinematicEntity) {
        self.current_look_ahead = 0.0;
        self.scroll = self.desired_scroll(entity.position);
    }

    /// Whole-pixel scroll used for drawing
    #[inline]
    pub fn render_scroll(&self) -> Vec2 {
        self.scroll.floor()
    }

    /// Sub-pixel remainder dropped by `render_scroll`
    #[inline]
    pub fn scroll_diff(&self) -> Vec2 {
        self.scroll - self.render_scroll()
    }

    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point - self.render_scroll()
    }

    pub fn world_rect_to_screen(&self, rect: Rect) -> Rect {
        rect.translated(-self.render_scroll())
    }

    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        point + self.render_scroll()
    }
}
