//! Fixed timestep simulation tick
//!
//! One tick runs strictly in the order input → physics → camera. The render
//! query (`frame_view`) is read-only and may be taken at any point after.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Rect;
use super::entity::{AnimationState, HorizontalIntent};
use super::state::World;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Desired horizontal direction
    pub horizontal: HorizontalIntent,
    /// Jump (one-shot; hosts clear it after the tick that consumed it)
    pub jump: bool,
}

/// Advance the world by one timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        log::warn!("Ignoring tick with invalid dt {dt}");
        return;
    }
    let dt = dt.min(MAX_FRAME_DT);

    world.time_ticks += 1;

    // Physics: only the player listens to input
    let player_id = world.player_id;
    for entity in &mut world.entities {
        let (intent, jump) = if entity.id == player_id {
            (input.horizontal, input.jump)
        } else {
            (HorizontalIntent::None, false)
        };
        entity.tick(dt, intent, jump, &world.tiles);
    }

    // Camera follows whatever it is bound to
    let target = world
        .camera
        .target()
        .and_then(|id| world.entities.iter().find(|e| e.id == id));
    world.camera.tick(target);

    // Ensure deterministic ordering
    world.normalize_order();
}

/// Accumulates variable frame time into fixed simulation steps
#[derive(Debug, Clone)]
pub struct FixedStep {
    pub step: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(step: f32) -> Self {
        Self {
            step,
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed time and return how many steps to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 || self.step <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a step left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }
}

/// What a renderer needs to place one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub id: u32,
    pub tag: String,
    pub position: Vec2,
    pub screen_position: Vec2,
    pub size: Vec2,
    pub animation: AnimationState,
    pub flip: bool,
}

/// What a renderer needs to draw one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileView {
    pub screen_rect: Rect,
    pub color: [u8; 3],
}

/// Read-only per-tick output for renderers
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub tick: u64,
    pub scroll: Vec2,
    pub scroll_diff: Vec2,
    pub entities: Vec<EntityView>,
    /// Tiles intersecting the viewport, in insertion order
    pub tiles: Vec<TileView>,
}

/// Snapshot the world in screen space
pub fn frame_view(world: &World) -> FrameView {
    let camera = &world.camera;
    let viewport = Rect::from_pos_size(camera.render_scroll(), camera.viewport_size);

    let entities = world
        .entities
        .iter()
        .map(|e| EntityView {
            id: e.id,
            tag: e.tag.clone(),
            position: e.position,
            screen_position: camera.world_to_screen(e.position),
            size: e.size,
            animation: e.animation,
            flip: e.flip,
        })
        .collect();

    let tiles = world
        .tiles
        .collision_test(viewport)
        .map(|t| TileView {
            screen_rect: camera.world_rect_to_screen(t.rect()),
            color: t.color,
        })
        .collect();

    FrameView {
        tick: world.time_ticks,
        scroll: camera.scroll,
        scroll_diff: camera.scroll_diff(),
        entities,
        tiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::level::LevelDesc;
    use crate::settings::Settings;
    use crate::sim::TileMap;

    fn demo_world() -> World {
        World::from_level(&LevelDesc::demo(), &Settings::default())
    }

    #[test]
    fn test_demo_player_settles_on_floor() {
        let mut world = demo_world();
        let input = TickInput::default();
        for _ in 0..120 {
            tick(&mut world, &input, 1.0 / 60.0);
        }
        let player = world.player().unwrap();
        assert_eq!(player.position.y, 182.0);
        assert_eq!(player.velocity.y, 0.0);
        assert!(player.is_grounded);
        assert_eq!(world.time_ticks, 120);
    }

    #[test]
    fn test_invalid_dt_does_not_advance() {
        let mut world = demo_world();
        let input = TickInput {
            horizontal: HorizontalIntent::Right,
            jump: true,
        };
        tick(&mut world, &input, 0.0);
        tick(&mut world, &input, -0.5);
        tick(&mut world, &input, f32::INFINITY);
        assert_eq!(world.time_ticks, 0);
        assert_eq!(world.player().unwrap().position, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_only_player_receives_input() {
        let mut world = demo_world();
        let other = world.spawn_entity("crate", Vec2::new(300.0, 100.0), Vec2::new(16.0, 16.0));
        let input = TickInput {
            horizontal: HorizontalIntent::Right,
            jump: false,
        };
        for _ in 0..120 {
            tick(&mut world, &input, SIM_DT);
        }
        assert!(world.player().unwrap().position.x > 50.0);
        let crate_entity = world.entity(other).unwrap();
        assert_eq!(crate_entity.position, Vec2::new(300.0, 184.0));
    }

    #[test]
    fn test_camera_follows_player() {
        let mut world = demo_world();
        let start = world.camera.scroll;
        let input = TickInput {
            horizontal: HorizontalIntent::Right,
            jump: false,
        };
        for _ in 0..240 {
            tick(&mut world, &input, SIM_DT);
        }
        assert!(world.camera.scroll.x > start.x);
        // Running at full speed pushes the look-ahead forward
        assert!(world.camera.current_look_ahead > 0.0);
    }

    #[test]
    fn test_unbound_camera_stays_put() {
        let mut world = demo_world();
        world.camera.unbind();
        let start = world.camera.scroll;
        for _ in 0..60 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert_eq!(world.camera.scroll, start);
    }

    #[test]
    fn test_empty_world_free_fall() {
        let mut world = World::new(TileMap::new(), Vec2::ZERO, Vec2::new(9.0, 18.0), &Settings::default());
        for _ in 0..60 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        let player = world.player().unwrap();
        assert!(player.position.y > 0.0);
        assert!(!player.collisions.any());
    }

    #[test]
    fn test_determinism() {
        // Two worlds fed the same inputs must produce identical trajectories
        let mut world1 = World::from_level(&LevelDesc::generate_course(99999, 10), &Settings::default());
        let mut world2 = World::from_level(&LevelDesc::generate_course(99999, 10), &Settings::default());

        let inputs = [
            TickInput {
                horizontal: HorizontalIntent::Right,
                jump: false,
            },
            TickInput {
                horizontal: HorizontalIntent::Right,
                jump: true,
            },
            TickInput::default(),
            TickInput {
                horizontal: HorizontalIntent::Left,
                jump: false,
            },
        ];

        for i in 0..600 {
            let input = &inputs[(i / 37) % inputs.len()];
            tick(&mut world1, input, SIM_DT);
            tick(&mut world2, input, SIM_DT);

            let p1 = world1.player().unwrap();
            let p2 = world2.player().unwrap();
            assert_eq!(p1.position.x.to_bits(), p2.position.x.to_bits());
            assert_eq!(p1.position.y.to_bits(), p2.position.y.to_bits());
        }
        assert_eq!(world1.camera.scroll, world2.camera.scroll);
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut stepper = FixedStep::new(SIM_DT);
        assert_eq!(stepper.advance(SIM_DT * 0.5), 0);
        assert_eq!(stepper.advance(SIM_DT * 0.6), 1);
        assert!(stepper.alpha() > 0.0 && stepper.alpha() < 1.0);
        assert_eq!(stepper.advance(SIM_DT * 3.0), 3);
    }

    #[test]
    fn test_fixed_step_clamps_stalls() {
        let mut stepper = FixedStep::new(SIM_DT);
        // A 2 s stall is clamped to MAX_FRAME_DT (about 6 steps at 60 Hz)
        let steps = stepper.advance(2.0);
        assert!((5..=6).contains(&steps), "got {steps} steps");
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.advance(f32::NAN), 0);
    }

    #[test]
    fn test_frame_view_is_in_screen_space() {
        let mut world = demo_world();
        for _ in 0..120 {
            tick(&mut world, &TickInput::default(), SIM_DT);
        }
        let view = frame_view(&world);
        assert_eq!(view.tick, 120);
        assert_eq!(view.entities.len(), 1);

        let player = &view.entities[0];
        assert_eq!(player.animation, AnimationState::Idle);
        assert_eq!(player.screen_position, player.position - world.camera.scroll.floor());

        // Only the floor is on screen at the start of the demo
        assert_eq!(view.tiles.len(), 1);
        assert_eq!(view.tiles[0].color, [100, 0, 0]);
    }
}
