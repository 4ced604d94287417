//! Grid cells: wall tiles and camera zones
//!
//! Both occupy exactly one cell of the tile grid and answer the same question: does a
//! world-space point fall in my cell? The test is cell-exact, using floor division of
//! world coordinates by the tile size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Grid cell containing `point` for a given tile size
#[inline]
pub fn cell_of(point: Vec2, tile_size: f32) -> (i32, i32) {
    (
        (point.x / tile_size).floor() as i32,
        (point.y / tile_size).floor() as i32,
    )
}

/// Anything that occupies a single grid cell
pub trait GridCell {
    /// Cell coordinates (tx, ty)
    fn cell(&self) -> (i32, i32);

    /// Edge length of the cell in world units
    fn tile_size(&self) -> f32;

    /// World-space centre of the cell
    fn center(&self) -> Vec2 {
        let (tx, ty) = self.cell();
        Vec2::new(
            (tx as f32 + 0.5) * self.tile_size(),
            (ty as f32 + 0.5) * self.tile_size(),
        )
    }

    /// True iff `point` lies in this cell
    fn contains_point(&self, point: Vec2) -> bool {
        cell_of(point, self.tile_size()) == self.cell()
    }
}

/// A wall tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub grid_x: i32,
    pub grid_y: i32,
    /// Blocks movement while false
    pub passable: bool,
    pub visible: bool,
    /// Unlock trigger id that opens this tile
    pub tag: Option<String>,
    size: f32,
}

impl Tile {
    pub fn new(grid_x: i32, grid_y: i32, tag: Option<String>, size: f32) -> Self {
        Self {
            grid_x,
            grid_y,
            passable: false,
            visible: true,
            tag,
            size,
        }
    }

    /// Whether this tile currently stops an entity from entering `point`
    #[inline]
    pub fn blocks(&self, point: Vec2) -> bool {
        !self.passable && self.contains_point(point)
    }

    /// Open the tile: passable and hidden
    pub fn unlock(&mut self) {
        self.passable = true;
        self.visible = false;
    }
}

impl GridCell for Tile {
    fn cell(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    fn tile_size(&self) -> f32 {
        self.size
    }
}

/// A camera focus region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraZone {
    pub grid_x: i32,
    pub grid_y: i32,
    size: f32,
}

impl CameraZone {
    pub fn new(grid_x: i32, grid_y: i32, size: f32) -> Self {
        Self { grid_x, grid_y, size }
    }

    /// World-space point this zone keeps centred in the viewport
    pub fn focus_point(&self) -> Vec2 {
        self.center()
    }
}

impl GridCell for CameraZone {
    fn cell(&self) -> (i32, i32) {
        (self.grid_x, self.grid_y)
    }

    fn tile_size(&self) -> f32 {
        self.size
    }
}
