//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the step's delta
//! - Seeded RNG only
//! - Stable iteration order (load order for tiles and zones, draw order for monsters)
//! - No rendering, platform, or file dependencies

pub mod camera;
pub mod collision;
pub mod hero;
pub mod monster;
pub mod state;
pub mod tick;
pub mod tile;
pub mod timers;

pub use camera::{Camera, ViewRect, focus_offset};
pub use collision::{SlideResult, circle_contains, slide_against_tiles, within_reach};
pub use hero::{Hero, HeroActions, Mode};
pub use monster::{AiState, Attack, AttackStats, Corpse, Monster, Rank, Strike, Surroundings};
pub use state::{GameEvent, HeroSnapshot, MonsterSnapshot, Snapshot, TileSnapshot, World};
pub use tick::{Action, FrameDelta, InputSource, TickInput, tick};
pub use tile::{CameraZone, GridCell, Tile, cell_of};
pub use timers::{TimerEvent, TimerId, TimerQueue};
