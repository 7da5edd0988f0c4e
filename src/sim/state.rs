//! World state
//!
//! Everything the simulation mutates lives here. Entities are kept sorted by
//! id so iteration order (and therefore every trajectory) is reproducible.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::entity::KinematicEntity;
use super::tilemap::TileMap;
use crate::level::LevelDesc;
use crate::settings::Settings;
use crate::tuning::MovementTuning;

/// Tag used for the input-driven entity
pub const PLAYER_TAG: &str = "player";

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Static obstacles (never mutated after construction)
    pub tiles: TileMap,
    /// Moving entities (sorted by id for determinism)
    pub entities: Vec<KinematicEntity>,
    pub camera: Camera,
    /// Entity driven by `TickInput`
    pub player_id: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Default tuning for spawned entities
    pub movement: MovementTuning,
    /// Next entity ID
    next_id: u32,
}

impl World {
    /// Build a world around `tiles` with the player at `spawn`; the camera
    /// starts bound to and centred on the player
    pub fn new(tiles: TileMap, spawn: Vec2, player_size: Vec2, settings: &Settings) -> Self {
        let mut world = Self {
            tiles,
            entities: Vec::new(),
            camera: Camera::new(settings.viewport_size(), settings.camera),
            player_id: 0,
            time_ticks: 0,
            movement: settings.movement,
            next_id: 1,
        };

        world.player_id = world.spawn_entity(PLAYER_TAG, spawn, player_size);
        let player_id = world.player_id;
        world.camera.bind(player_id);
        if let Some(player) = world.entities.iter().find(|e| e.id == player_id) {
            world.camera.snap_to(player);
        }

        log::info!(
            "World built: {} tiles, player {} at {:?}",
            world.tiles.len(),
            world.player_id,
            spawn
        );
        world
    }

    pub fn from_level(level: &LevelDesc, settings: &Settings) -> Self {
        Self::new(level.to_tile_map(), level.spawn, level.player_size, settings)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an idle-driven entity using the world's default tuning
    pub fn spawn_entity(&mut self, tag: &str, position: Vec2, size: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.entities
            .push(KinematicEntity::new(id, tag, position, size, self.movement));
        self.normalize_order();
        id
    }

    pub fn entity(&self, id: u32) -> Option<&KinematicEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut KinematicEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn player(&self) -> Option<&KinematicEntity> {
        self.entity(self.player_id)
    }

    pub fn player_mut(&mut self) -> Option<&mut KinematicEntity> {
        let id = self.player_id;
        self.entity_mut(id)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Rect;

    #[test]
    fn test_world_from_demo_level() {
        let world = World::from_level(&LevelDesc::demo(), &Settings::default());
        assert_eq!(world.tiles.len(), 4);
        assert_eq!(world.entities.len(), 1);

        let player = world.player().unwrap();
        assert_eq!(player.position, Vec2::new(50.0, 50.0));
        assert_eq!(player.size, Vec2::new(9.0, 18.0));
        assert_eq!(player.tag, PLAYER_TAG);
        assert_eq!(world.camera.target(), Some(world.player_id));
    }

    #[test]
    fn test_camera_starts_centred_on_player() {
        let settings = Settings::default();
        let world = World::from_level(&LevelDesc::demo(), &settings);
        let expected = Vec2::new(50.0, 50.0) + settings.camera.target_offset - settings.viewport_size() / 2.0;
        assert_eq!(world.camera.scroll, expected);
    }

    #[test]
    fn test_spawned_entities_get_unique_sorted_ids() {
        let mut world = World::new(
            TileMap::from_rects([Rect::new(0.0, 200.0, 500.0, 20.0)]),
            Vec2::new(10.0, 10.0),
            Vec2::new(9.0, 18.0),
            &Settings::default(),
        );
        let crate_a = world.spawn_entity("crate", Vec2::new(100.0, 10.0), Vec2::new(16.0, 16.0));
        let crate_b = world.spawn_entity("crate", Vec2::new(200.0, 10.0), Vec2::new(16.0, 16.0));
        assert_ne!(crate_a, crate_b);
        assert_ne!(crate_a, world.player_id);

        let ids: Vec<u32> = world.entities.iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(world.entity(crate_b).unwrap().tag, "crate");
    }

    #[test]
    fn test_player_mut_edits_in_place() {
        let mut world = World::from_level(&LevelDesc::demo(), &Settings::default());
        world.player_mut().unwrap().velocity.x = 42.0;
        assert_eq!(world.player().unwrap().velocity.x, 42.0);
    }
}
