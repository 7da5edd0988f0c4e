//! World descriptions
//!
//! A level is an ordered list of obstacle rectangles plus a spawn point. It
//! can come from the built-in demo, a JSON file, or the seeded course
//! generator. Order matters only for iteration; resolution does not depend on it.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYER_SIZE, PLAYER_SPAWN};
use crate::sim::{Rect, Tile, TileMap};

/// Default tile colour when a level file leaves it out
const DEFAULT_TILE_COLOR: [u8; 3] = [100, 0, 0];

/// Platform palette for generated courses
const COURSE_PALETTE: [[u8; 3]; 4] = [[100, 0, 0], [255, 255, 0], [0, 0, 255], [40, 140, 60]];

/// Thickness of generated platforms
const COURSE_PLATFORM_THICKNESS: f32 = 20.0;

fn default_tile_color() -> [u8; 3] {
    DEFAULT_TILE_COLOR
}

/// A single obstacle in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDesc {
    pub position: Vec2,
    pub size: Vec2,
    #[serde(default = "default_tile_color")]
    pub color: [u8; 3],
}

impl TileDesc {
    pub fn new(color: [u8; 3], position: (f32, f32), size: (f32, f32)) -> Self {
        Self {
            position: Vec2::new(position.0, position.1),
            size: Vec2::new(size.0, size.1),
            color,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

/// Serializable world layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDesc {
    #[serde(default)]
    pub name: String,
    pub spawn: Vec2,
    pub player_size: Vec2,
    pub tiles: Vec<TileDesc>,
}

/// Errors raised while loading or validating a level
#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// A tile has a non-finite coordinate or a negative extent
    InvalidTile { index: usize, reason: String },
    /// The spawn point or player size is unusable
    InvalidSpawn(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "I/O error: {e}"),
            LevelError::Json(e) => write!(f, "JSON error: {e}"),
            LevelError::InvalidTile { index, reason } => write!(f, "invalid tile #{index}: {reason}"),
            LevelError::InvalidSpawn(reason) => write!(f, "invalid spawn: {reason}"),
        }
    }
}

impl std::error::Error for LevelError {}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Json(e)
    }
}

impl LevelDesc {
    /// The hand-built test strip: a long floor and three raised platforms
    pub fn demo() -> Self {
        Self {
            name: "demo".to_string(),
            spawn: Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1),
            player_size: Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
            tiles: vec![
                TileDesc::new([100, 0, 0], (0.0, 200.0), (5000.0, 20.0)),
                TileDesc::new([100, 0, 0], (1000.0, 100.0), (700.0, 20.0)),
                TileDesc::new([255, 255, 0], (2000.0, 100.0), (700.0, 20.0)),
                TileDesc::new([0, 0, 255], (3000.0, 100.0), (700.0, 20.0)),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelDesc = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level '{}' from {} ({} tiles)",
            level.name,
            path.display(),
            level.tiles.len()
        );
        Ok(level)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Level '{}' saved to {}", self.name, path.as_ref().display());
        Ok(())
    }

    /// Reject layouts that would corrupt the simulation
    pub fn validate(&self) -> Result<(), LevelError> {
        if !crate::is_finite_vec(self.spawn) {
            return Err(LevelError::InvalidSpawn(format!("non-finite spawn {:?}", self.spawn)));
        }
        if !crate::is_finite_vec(self.player_size) || self.player_size.x <= 0.0 || self.player_size.y <= 0.0 {
            return Err(LevelError::InvalidSpawn(format!(
                "player size must be positive, got {:?}",
                self.player_size
            )));
        }

        for (index, tile) in self.tiles.iter().enumerate() {
            if !crate::is_finite_vec(tile.position) || !crate::is_finite_vec(tile.size) {
                return Err(LevelError::InvalidTile {
                    index,
                    reason: "non-finite coordinate".to_string(),
                });
            }
            if tile.size.x < 0.0 || tile.size.y < 0.0 {
                return Err(LevelError::InvalidTile {
                    index,
                    reason: format!("negative size {:?}", tile.size),
                });
            }
        }

        let player = Rect::from_pos_size(self.spawn, self.player_size);
        if let Some(index) = self.tiles.iter().position(|t| t.rect().intersects(&player)) {
            return Err(LevelError::InvalidSpawn(format!("spawn overlaps tile #{index}")));
        }

        Ok(())
    }

    /// Static obstacle set in file order
    pub fn to_tile_map(&self) -> TileMap {
        self.tiles
            .iter()
            .map(|t| Tile::new(t.color, t.position, t.size))
            .collect()
    }

    /// Seeded run of platforms separated by jumpable gaps.
    ///
    /// Same seed, same course. Gaps and rises stay inside what the default
    /// movement tuning can clear (about 65 px of jump height).
    pub fn generate_course(seed: u64, segments: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut tiles = Vec::with_capacity(segments as usize + 1);

        // Safe starting floor under the spawn point
        let mut x = 0.0f32;
        let mut y = 200.0f32;
        let start_width = 160.0;
        tiles.push(TileDesc::new(COURSE_PALETTE[0], (x, y), (start_width, COURSE_PLATFORM_THICKNESS)));
        x += start_width;

        for _ in 0..segments {
            let gap = rng.random_range(16..=48) as f32;
            let width = rng.random_range(4..=16) as f32 * 16.0;
            let rise = rng.random_range(-2i32..=2) as f32 * 16.0;
            let color = COURSE_PALETTE[rng.random_range(0..COURSE_PALETTE.len())];

            x += gap;
            y = (y - rise).clamp(120.0, 260.0);
            tiles.push(TileDesc::new(color, (x, y), (width, COURSE_PLATFORM_THICKNESS)));
            x += width;
        }

        log::debug!("Generated course seed={seed} with {} tiles, length {x}", tiles.len());

        Self {
            name: format!("course-{seed}"),
            spawn: Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1),
            player_size: Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
            tiles,
        }
    }
}
