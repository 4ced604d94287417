//! Session configuration
//!
//! Static for the lifetime of a [`World`](crate::sim::World). Loaded from JSON by the host;
//! every field falls back to its default when omitted.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::tile::cell_of;

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Edge length of one grid cell in world units
    pub tile_size: f32,
    /// Viewport width in world units
    pub viewport_width: f32,
    /// Viewport height in world units
    pub viewport_height: f32,
    /// Seed for cosmetic randomness (rotation jitter, corpse visuals)
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            seed: 0,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Viewport dimensions as a vector
    pub fn viewport_size(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Grid cell containing a world-space point
    #[inline]
    pub fn cell_of(&self, point: Vec2) -> (i32, i32) {
        cell_of(point, self.tile_size)
    }

    /// World-space centre of a grid cell
    #[inline]
    pub fn cell_center(&self, tx: i32, ty: i32) -> Vec2 {
        Vec2::new(
            (tx as f32 + 0.5) * self.tile_size,
            (ty as f32 + 0.5) * self.tile_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = Config::from_json(r#"{"tile_size": 16}"#).unwrap();
        assert_eq!(config.tile_size, 16.0);
        assert_eq!(config.viewport_width, VIEWPORT_WIDTH);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Config::from_json("{tile_size: }").is_err());
    }

    #[test]
    fn test_cell_of_floors_negative_coordinates() {
        let config = Config::default();
        assert_eq!(config.cell_of(Vec2::new(-0.5, 31.9)), (-1, 0));
        assert_eq!(config.cell_of(Vec2::new(64.0, -64.0)), (2, -2));
    }

    #[test]
    fn test_cell_center() {
        let config = Config::default();
        assert_eq!(config.cell_center(0, 0), Vec2::new(16.0, 16.0));
        assert_eq!(config.cell_center(-1, 2), Vec2::new(-16.0, 80.0));
    }
}
