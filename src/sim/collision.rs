//! Collision tests against the tile grid
//!
//! Entities are points as far as walls are concerned. Each axis of a step is tested on its
//! own: if moving along x alone would land inside a blocking tile, the x velocity is dropped,
//! and likewise for y. That lets an entity slide along a wall it is pushing into.
//!
//! Entity-vs-entity checks are plain centre distances against a combined radius.

use glam::Vec2;

use super::tile::Tile;

/// Result of sliding a step against the tile grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideResult {
    /// Velocity with blocked axes zeroed
    pub velocity: Vec2,
    /// The x-only step hit a tile
    pub blocked_x: bool,
    /// The y-only step hit a tile
    pub blocked_y: bool,
}

impl SlideResult {
    pub fn free(velocity: Vec2) -> Self {
        Self {
            velocity,
            blocked_x: false,
            blocked_y: false,
        }
    }
}

/// Zero each axis of `velocity` whose single-axis step from `position` enters a blocking tile.
///
/// Tiles are visited in collection order; only impassable tiles block.
pub fn slide_against_tiles(position: Vec2, velocity: Vec2, tiles: &[Tile]) -> SlideResult {
    let mut result = SlideResult::free(velocity);
    let step_x = Vec2::new(position.x + velocity.x, position.y);
    let step_y = Vec2::new(position.x, position.y + velocity.y);

    for tile in tiles {
        if !result.blocked_x && tile.blocks(step_x) {
            result.velocity.x = 0.0;
            result.blocked_x = true;
        }
        if !result.blocked_y && tile.blocks(step_y) {
            result.velocity.y = 0.0;
            result.blocked_y = true;
        }
        if result.blocked_x && result.blocked_y {
            break;
        }
    }

    result
}

/// True if two centres are closer than `reach`
#[inline]
pub fn within_reach(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance(b) < reach
}

/// True if `point` lies strictly inside a circle
#[inline]
pub fn circle_contains(center: Vec2, radius: f32, point: Vec2) -> bool {
    within_reach(center, point, radius)
}
