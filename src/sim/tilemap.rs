//! Static obstacle set
//!
//! Tiles are added once when the world is built and never move afterwards.
//! Queries iterate in insertion order.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AxisAlignedBody, Rect};

/// Something the movement resolver can ask for overlapping obstacles
pub trait ObstacleQuery {
    /// Obstacles whose interior intersects `rect`, in a stable order
    fn overlapping(&self, rect: Rect) -> impl Iterator<Item = Rect> + '_;
}

impl ObstacleQuery for [Rect] {
    fn overlapping(&self, rect: Rect) -> impl Iterator<Item = Rect> + '_ {
        self.iter().copied().filter(move |r| r.intersects(&rect))
    }
}

impl ObstacleQuery for Vec<Rect> {
    fn overlapping(&self, rect: Rect) -> impl Iterator<Item = Rect> + '_ {
        self.as_slice().overlapping(rect)
    }
}

/// A solid, coloured obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub body: AxisAlignedBody,
    /// RGB fill colour for renderers
    pub color: [u8; 3],
}

impl Tile {
    pub fn new(color: [u8; 3], position: Vec2, size: Vec2) -> Self {
        Self {
            body: AxisAlignedBody::new(position, size),
            color,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }
}

/// Insertion-ordered collection of static tiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileMap {
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    /// Build from bare rectangles (uniform colour), keeping their order
    pub fn from_rects<I: IntoIterator<Item = Rect>>(rects: I) -> Self {
        rects
            .into_iter()
            .map(|r| Tile::new([100, 0, 0], r.position(), r.size()))
            .collect()
    }

    pub fn add(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    pub fn extend<I: IntoIterator<Item = Tile>>(&mut self, tiles: I) {
        self.tiles.extend(tiles);
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles intersecting `rect`, in insertion order
    pub fn collision_test(&self, rect: Rect) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter().filter(move |t| t.rect().intersects(&rect))
    }

    /// Union of every tile's rectangle (None when empty)
    pub fn bounds(&self) -> Option<Rect> {
        let mut iter = self.tiles.iter().map(Tile::rect);
        let first = iter.next()?;
        let (min, max) = iter.fold(
            (first.position(), first.position() + first.size()),
            |(min, max), r| (min.min(r.position()), max.max(r.position() + r.size())),
        );
        Some(Rect::from_pos_size(min, max - min))
    }
}

impl FromIterator<Tile> for TileMap {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}

impl ObstacleQuery for TileMap {
    fn overlapping(&self, rect: Rect) -> impl Iterator<Item = Rect> + '_ {
        self.collision_test(rect).map(Tile::rect)
    }
}
