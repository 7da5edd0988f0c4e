//! Deterministic simulation module
//!
//! All movement and camera logic lives here. This module must be pure and deterministic:
//! - Time advances only by the delta handed to `tick`
//! - Stable iteration order (tiles by insertion, entities by ID)
//! - No rendering, input-device or file dependencies

pub mod body;
pub mod camera;
pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;
pub mod tilemap;
pub mod timer;

pub use body::{AxisAlignedBody, MovableBody, Rect};
pub use camera::Camera;
pub use collision::{CollisionFlags, Resolution, resolve, resolve_body};
pub use entity::{AnimationState, HorizontalIntent, KinematicEntity};
pub use state::{PLAYER_TAG, World};
pub use tick::{EntityView, FixedStep, FrameView, TickInput, TileView, frame_view, tick};
pub use tilemap::{ObstacleQuery, Tile, TileMap};
pub use timer::Timer;
