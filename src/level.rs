//! Level data records
//!
//! Plain structured data read once when a [`World`](crate::sim::World) is built, and written
//! back out by level-authoring tools. Every optional field has a documented default; nothing
//! here is an error.

use serde::{Deserialize, Serialize};

use crate::sim::Rank;

/// Hero spawn cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRecord {
    pub tx: i32,
    pub ty: i32,
}

impl Default for HeroRecord {
    fn default() -> Self {
        Self { tx: 7, ty: 4 }
    }
}

/// A wall tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub tx: i32,
    pub ty: i32,
    /// Unlock trigger this tile belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A camera zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub tx: i32,
    pub ty: i32,
}

/// Optional attack overrides for a monster spawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackRecord {
    /// Half-hearts (default 1)
    #[serde(default)]
    pub damage: Option<f32>,
    /// Seconds (default 1.5)
    #[serde(default)]
    pub cooldown: Option<f32>,
}

/// A monster spawn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub tx: i32,
    pub ty: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<AttackRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
}

/// A one-shot unlock: when the hero enters (tx, ty), every tile tagged `id` opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRecord {
    pub id: String,
    pub tx: i32,
    pub ty: i32,
}

/// A complete level description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    pub hero: HeroRecord,
    pub tiles: Vec<TileRecord>,
    pub cameras: Vec<CameraRecord>,
    pub monsters: Vec<MonsterRecord>,
    pub unlocks: Vec<UnlockRecord>,
}

impl LevelData {
    /// Parse a level from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the level to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
