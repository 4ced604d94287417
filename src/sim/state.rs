//! World state and snapshots
//!
//! Everything one session of play needs lives in [`World`]. Entities never hold references to
//! each other or to the world; the step function hands each one the slices it may read.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::{Camera, ViewRect};
use super::hero::{Hero, Mode};
use super::monster::{AiState, Monster};
use super::tile::{CameraZone, GridCell, Tile};
use super::timers::TimerQueue;
use crate::config::Config;
use crate::level::{CameraRecord, HeroRecord, LevelData, MonsterRecord, TileRecord, UnlockRecord};

/// Things the UI layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ModeChanged(Mode),
    MonsterAngered { id: u32 },
    MonsterKilled { id: u32 },
    HeroHurt { health: f32 },
    HeroDied,
    Unlocked { id: String },
    TileAuthored { tx: i32, ty: i32 },
    EndingStarted,
    LevelComplete,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct World {
    pub config: Config,
    pub hero: Hero,
    /// Walls, in load order (authored tiles appended)
    pub tiles: Vec<Tile>,
    /// Camera zones, in load order; the first match wins
    pub cameras: Vec<CameraZone>,
    /// Monsters, kept in draw order after every step
    pub monsters: Vec<Monster>,
    pub unlocks: Vec<UnlockRecord>,
    /// Unlock id -> already fired
    pub triggers: BTreeMap<String, bool>,
    pub camera: Camera,
    pub timers: TimerQueue,
    /// Active monster spawners, tracked by the host (`None` = not tracked)
    pub spawner_count: Option<u32>,
    pub ending_started: bool,
    pub level_complete: bool,
    /// Steps simulated so far
    pub time_steps: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Build a world from level data
    pub fn new(config: Config, level: &LevelData) -> Self {
        let size = config.tile_size;
        let rng = Pcg32::seed_from_u64(config.seed);

        let mut world = Self {
            hero: Hero::new((level.hero.tx, level.hero.ty), size),
            tiles: level
                .tiles
                .iter()
                .map(|t| Tile::new(t.tx, t.ty, t.tag.clone(), size))
                .collect(),
            cameras: level
                .cameras
                .iter()
                .map(|c| CameraZone::new(c.tx, c.ty, size))
                .collect(),
            monsters: Vec::with_capacity(level.monsters.len()),
            unlocks: level.unlocks.clone(),
            triggers: level.unlocks.iter().map(|u| (u.id.clone(), false)).collect(),
            camera: Camera::default(),
            timers: TimerQueue::new(),
            spawner_count: None,
            ending_started: false,
            level_complete: false,
            time_steps: 0,
            rng,
            events: Vec::new(),
            next_id: 1,
            config,
        };

        for record in &level.monsters {
            let id = world.next_entity_id();
            world.monsters.push(Monster::from_record(id, record, size));
        }

        world.jump_camera_to_hero();
        log::info!(
            "Level loaded: {} tiles, {} camera zones, {} monsters, {} unlocks",
            world.tiles.len(),
            world.cameras.len(),
            world.monsters.len(),
            world.unlocks.len()
        );
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Aim the camera for the hero's current position and snap to it
    pub fn jump_camera_to_hero(&mut self) {
        let focus = self.hero.choose_focus(&self.cameras);
        self.camera.focus(focus, self.config.viewport_size());
        self.camera.jump();
    }

    /// Screen rectangle grown by one tile: where dormant monsters wake up
    pub fn activation_rect(&self) -> ViewRect {
        self.camera
            .view_rect(self.config.viewport_size(), self.config.tile_size)
    }

    /// Update the host-maintained spawner count
    pub fn set_spawner_count(&mut self, count: Option<u32>) {
        self.spawner_count = count;
    }

    pub fn monster(&self, id: u32) -> Option<&Monster> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn monster_mut(&mut self, id: u32) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|m| m.id == id)
    }

    /// Tile occupying a cell, if any
    pub fn tile_at(&self, tx: i32, ty: i32) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.cell() == (tx, ty))
    }

    /// Corpses first, then living monsters top to bottom. Stable, so ties keep their order.
    pub fn sort_for_draw(&mut self) {
        self.monsters.sort_by(|a, b| {
            b.is_dead()
                .cmp(&a.is_dead())
                .then(a.position.y.total_cmp(&b.position.y))
        });
    }

    /// Every monster back to spawn
    pub fn reset_monsters(&mut self) {
        for monster in &mut self.monsters {
            monster.reset();
        }
    }

    /// Hero back to spawn, monsters reset, camera snapped
    pub fn respawn_hero(&mut self) {
        self.hero.respawn();
        self.reset_monsters();
        self.jump_camera_to_hero();
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Current state, for tools and debugging
    pub fn snapshot(&self) -> Snapshot {
        let (tx, ty) = self.hero.cell(self.config.tile_size);
        Snapshot {
            hero: HeroSnapshot {
                tx,
                ty,
                x: self.hero.position.x,
                y: self.hero.position.y,
                health: self.hero.health,
                mode: self.hero.mode,
            },
            tiles: self
                .tiles
                .iter()
                .map(|t| TileSnapshot {
                    tx: t.grid_x,
                    ty: t.grid_y,
                    tag: t.tag.clone(),
                    passable: t.passable,
                    visible: t.visible,
                })
                .collect(),
            cameras: self
                .cameras
                .iter()
                .map(|c| CameraRecord {
                    tx: c.grid_x,
                    ty: c.grid_y,
                })
                .collect(),
            monsters: self
                .monsters
                .iter()
                .map(|m| MonsterSnapshot {
                    id: m.id,
                    spawn: m.record(),
                    x: m.position.x,
                    y: m.position.y,
                    health: m.health,
                    state: m.state,
                })
                .collect(),
        }
    }

    /// Spawn-form level description, including tiles authored in dev mode
    pub fn level_data(&self) -> LevelData {
        let mut monsters: Vec<(u32, MonsterRecord)> =
            self.monsters.iter().map(|m| (m.id, m.record())).collect();
        // Load order, not draw order
        monsters.sort_by_key(|(id, _)| *id);

        LevelData {
            hero: HeroRecord {
                tx: self.hero.spawn_cell.0,
                ty: self.hero.spawn_cell.1,
            },
            tiles: self
                .tiles
                .iter()
                .map(|t| TileRecord {
                    tx: t.grid_x,
                    ty: t.grid_y,
                    tag: t.tag.clone(),
                })
                .collect(),
            cameras: self
                .cameras
                .iter()
                .map(|c| CameraRecord {
                    tx: c.grid_x,
                    ty: c.grid_y,
                })
                .collect(),
            monsters: monsters.into_iter().map(|(_, record)| record).collect(),
            unlocks: self.unlocks.clone(),
        }
    }

    /// Rendered world offset
    pub fn offset(&self) -> Vec2 {
        self.camera.offset
    }

    /// Monsters still alive and awake
    pub fn angered_count(&self) -> usize {
        self.monsters.iter().filter(|m| m.is_angered()).count()
    }

    /// Monsters in a given AI state
    pub fn count_in_state(&self, state: AiState) -> usize {
        self.monsters.iter().filter(|m| m.state == state).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSnapshot {
    pub tx: i32,
    pub ty: i32,
    pub x: f32,
    pub y: f32,
    pub health: f32,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub tx: i32,
    pub ty: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub passable: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSnapshot {
    pub id: u32,
    pub spawn: MonsterRecord,
    pub x: f32,
    pub y: f32,
    pub health: f32,
    pub state: AiState,
}

/// Read-only projection of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub hero: HeroSnapshot,
    pub tiles: Vec<TileSnapshot>,
    pub cameras: Vec<CameraRecord>,
    pub monsters: Vec<MonsterSnapshot>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Rank;

    fn level() -> LevelData {
        LevelData {
            hero: HeroRecord { tx: 2, ty: 2 },
            tiles: vec![
                TileRecord { tx: 0, ty: 0, tag: None },
                TileRecord { tx: 1, ty: 0, tag: Some("door".into()) },
            ],
            cameras: vec![CameraRecord { tx: 2, ty: 2 }],
            monsters: vec![
                MonsterRecord { tx: 5, ty: 9, rank: Some(Rank::Tank), ..Default::default() },
                MonsterRecord { tx: 6, ty: 1, ..Default::default() },
            ],
            unlocks: vec![UnlockRecord { id: "door".into(), tx: 3, ty: 3 }],
        }
    }

    #[test]
    fn test_new_world_from_level() {
        let world = World::new(Config::default(), &level());
        assert_eq!(world.tiles.len(), 2);
        assert_eq!(world.monsters[0].id, 1);
        assert_eq!(world.monsters[1].id, 2);
        assert_eq!(world.triggers.get("door"), Some(&false));
        assert!(world.tile_at(1, 0).is_some());
        assert!(world.tile_at(4, 4).is_none());
    }

    #[test]
    fn test_camera_starts_on_hero_zone() {
        let world = World::new(Config::default(), &level());
        // Zone (2, 2) centre is (80, 80); viewport is 640x360
        assert_eq!(world.camera.target, Vec2::new(240.0, 100.0));
        assert_eq!(world.offset(), world.camera.target);
        assert_eq!(world.hero.active_camera, Some(0));
    }

    #[test]
    fn test_sort_for_draw() {
        let mut world = World::new(Config::default(), &level());
        world.sort_for_draw();
        assert_eq!(world.monsters[0].id, 2);
        assert_eq!(world.monsters[1].id, 1);

        world.monsters[1].state = AiState::Dead;
        world.sort_for_draw();
        assert_eq!(world.monsters[0].id, 1);
    }

    #[test]
    fn test_level_data_keeps_load_order() {
        let mut world = World::new(Config::default(), &level());
        world.sort_for_draw();
        let exported = world.level_data();
        assert_eq!((exported.monsters[0].tx, exported.monsters[0].ty), (5, 9));
        assert_eq!(exported.monsters[0].rank, Some(Rank::Tank));
        assert_eq!(exported.tiles, level().tiles);
        assert_eq!(exported.hero, HeroRecord { tx: 2, ty: 2 });

        let reloaded = World::new(Config::default(), &exported);
        assert_eq!(reloaded.monsters[0].spawn_health, world.monster(1).unwrap().spawn_health);
    }

    #[test]
    fn test_snapshot_serializes() {
        let world = World::new(Config::default(), &level());
        let snapshot = world.snapshot();
        assert_eq!((snapshot.hero.tx, snapshot.hero.ty), (2, 2));
        assert_eq!(snapshot.monsters.len(), 2);
        assert_eq!(snapshot.monsters[0].state, AiState::Dormant);

        let json = snapshot.to_json().unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_respawn_hero_resets_monsters() {
        let mut world = World::new(Config::default(), &level());
        world.hero.position = Vec2::new(500.0, 500.0);
        world.hero.health = 0.0;
        world.monsters[0].state = AiState::Chasing;
        world.monsters[0].position = Vec2::ZERO;

        world.respawn_hero();
        assert_eq!(world.hero.cell(32.0), (2, 2));
        assert!(!world.hero.is_dead());
        assert_eq!(world.monsters[0].state, AiState::Dormant);
        assert_eq!(world.monsters[0].position, world.monsters[0].spawn_position);
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut world = World::new(Config::default(), &level());
        world.push_event(GameEvent::HeroDied);
        assert_eq!(world.drain_events(), vec![GameEvent::HeroDied]);
        assert!(world.drain_events().is_empty());
    }
}
