//! Per-frame simulation step
//!
//! One call advances the whole world by one rendered frame, in a fixed order: hero (input,
//! movement, camera choice, actions), monsters, draw-order sort, camera smoothing, unlock
//! triggers, the win check, and finally the deferred timers.

use glam::Vec2;

use super::hero::Mode;
use super::monster::{AiState, Attack, Surroundings};
use super::state::{GameEvent, World};
use super::tile::Tile;
use super::timers::TimerEvent;
use crate::angle_of;
use crate::consts::*;

/// Discrete input actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Attack in game mode, place tiles in dev mode
    Primary,
    GameMode,
    DevMode,
    /// Dev mode: refill health in place and reset monsters
    Respawn,
}

/// Polled input. The step reads it once per frame and keeps nothing between frames.
pub trait InputSource {
    /// Horizontal stick in [-1, 1]
    fn axis_x(&self) -> f32;
    /// Vertical stick in [-1, 1]
    fn axis_y(&self) -> f32;
    fn is_action_down(&self, action: Action) -> bool;
    fn is_action_just_pressed(&self, action: Action) -> bool;
}

/// Input captured for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub axis: Vec2,
    pub held: Vec<Action>,
    pub pressed: Vec<Action>,
}

impl TickInput {
    /// Stick input only
    pub fn axis(x: f32, y: f32) -> Self {
        Self {
            axis: Vec2::new(x, y),
            ..Default::default()
        }
    }

    /// Action pressed this frame (and therefore held)
    pub fn press(mut self, action: Action) -> Self {
        self.pressed.push(action);
        self.held.push(action);
        self
    }

    /// Action held from an earlier frame
    pub fn hold(mut self, action: Action) -> Self {
        self.held.push(action);
        self
    }

    /// Read every value from another source once
    pub fn capture<I: InputSource + ?Sized>(source: &I) -> Self {
        const ACTIONS: [Action; 4] = [
            Action::Primary,
            Action::GameMode,
            Action::DevMode,
            Action::Respawn,
        ];
        Self {
            axis: Vec2::new(source.axis_x(), source.axis_y()),
            held: ACTIONS
                .into_iter()
                .filter(|a| source.is_action_down(*a))
                .collect(),
            pressed: ACTIONS
                .into_iter()
                .filter(|a| source.is_action_just_pressed(*a))
                .collect(),
        }
    }
}

impl InputSource for TickInput {
    fn axis_x(&self) -> f32 {
        self.axis.x.clamp(-1.0, 1.0)
    }

    fn axis_y(&self) -> f32 {
        self.axis.y.clamp(-1.0, 1.0)
    }

    fn is_action_down(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    fn is_action_just_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }
}

/// Time covered by one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    pub seconds: f32,
}

impl FrameDelta {
    pub fn from_seconds(seconds: f32) -> Self {
        Self { seconds }
    }

    /// Step length in reference frames (1.0 at 60 FPS)
    #[inline]
    pub fn frames(&self) -> f32 {
        self.seconds * REFERENCE_FPS
    }
}

/// Advance the world by one frame
pub fn tick<I: InputSource + ?Sized>(world: &mut World, input: &I, delta: FrameDelta) {
    world.time_steps += 1;

    update_hero(world, input, delta);

    if world.hero.mode == Mode::Game {
        update_monsters(world, delta.seconds);
    }

    world.sort_for_draw();
    world.camera.smooth();

    run_unlocks(world);
    check_ending(world);

    for event in world.timers.advance(delta.seconds) {
        fire_timer(world, event);
    }
}

fn update_hero<I: InputSource + ?Sized>(world: &mut World, input: &I, delta: FrameDelta) {
    let actions = world.hero.update(input, delta, &world.tiles);

    if let Some(mode) = actions.mode_changed {
        log::info!("Switched to {mode:?} mode");
        world.push_event(GameEvent::ModeChanged(mode));
    }

    let focus = world.hero.choose_focus(&world.cameras);
    world.camera.focus(focus, world.config.viewport_size());

    if actions.author_tile {
        author_tile(world);
    }
    if actions.respawn {
        let position = world.hero.position;
        world.respawn_hero();
        world.hero.revive_at(position);
    }
    if actions.swing {
        swing(world);
    }
}

/// Dev mode: wall off the hero's cell
fn author_tile(world: &mut World) {
    let (tx, ty) = world.hero.cell(world.config.tile_size);
    if world.tile_at(tx, ty).is_some() {
        return;
    }
    world
        .tiles
        .push(Tile::new(tx, ty, None, world.config.tile_size));
    log::debug!("Authored tile at ({tx}, {ty})");
    world.push_event(GameEvent::TileAuthored { tx, ty });
}

/// Sword swing: hits every living monster covering the strike point
fn swing(world: &mut World) {
    let point = world.hero.strike_point();
    let hero_position = world.hero.position;

    for monster in &mut world.monsters {
        if monster.is_dead() || !monster.contains_point(point) {
            continue;
        }
        let attack = Attack {
            direction: angle_of(monster.position - hero_position),
            force: HERO_ATTACK_FORCE,
            damage: HERO_ATTACK_DAMAGE,
        };
        if monster.be_attacked(&attack, &mut world.rng) {
            world.events.push(GameEvent::MonsterKilled { id: monster.id });
        }
    }
}

fn update_monsters(world: &mut World, dt: f32) {
    let env = Surroundings {
        hero_position: world.hero.position,
        hero_radius: world.hero.radius,
        tiles: &world.tiles,
        view: world.activation_rect(),
    };

    let mut strikes = Vec::new();
    for monster in &mut world.monsters {
        let was_dormant = monster.state == AiState::Dormant;
        if let Some(strike) = monster.update(&env, &mut world.rng, dt) {
            strikes.push(strike);
        }
        if was_dormant && monster.state == AiState::Chasing {
            world.events.push(GameEvent::MonsterAngered { id: monster.id });
        }
    }

    for strike in strikes {
        if !world.hero.be_attacked(&strike) {
            continue;
        }
        world.push_event(GameEvent::HeroHurt {
            health: world.hero.health,
        });
        if world.hero.is_dead() {
            log::info!("Hero died; respawning");
            world.push_event(GameEvent::HeroDied);
            world.respawn_hero();
            break;
        }
    }
}

/// One-shot door openings keyed by the hero's cell
fn run_unlocks(world: &mut World) {
    let cell = world.hero.cell(world.config.tile_size);

    for unlock in &world.unlocks {
        if (unlock.tx, unlock.ty) != cell {
            continue;
        }
        let fired = world.triggers.entry(unlock.id.clone()).or_insert(false);
        if *fired {
            continue;
        }
        *fired = true;

        let mut opened = 0;
        for tile in world
            .tiles
            .iter_mut()
            .filter(|t| t.tag.as_deref() == Some(unlock.id.as_str()))
        {
            tile.unlock();
            opened += 1;
        }
        log::info!("Unlock '{}' fired, opened {opened} tiles", unlock.id);
        world.events.push(GameEvent::Unlocked {
            id: unlock.id.clone(),
        });
    }
}

/// Win sequence: once no spawners remain, stun every awake monster and queue the finishing
/// blows and the level-complete signal
fn check_ending(world: &mut World) {
    if world.ending_started || world.spawner_count != Some(0) {
        return;
    }
    world.ending_started = true;
    log::info!("No spawners left; starting ending sequence");
    world.push_event(GameEvent::EndingStarted);

    let hero_position = world.hero.position;
    let mut queued = 0;
    for monster in &mut world.monsters {
        if !monster.is_angered() {
            continue;
        }
        let stun = Attack {
            direction: angle_of(monster.position - hero_position),
            force: ENDING_STUN_FORCE,
            damage: ENDING_STUN_DAMAGE,
        };
        if monster.be_attacked(&stun, &mut world.rng) {
            world.events.push(GameEvent::MonsterKilled { id: monster.id });
        }

        queued += 1;
        let delay = ENDING_FINISH_DELAY + queued as f32 * ENDING_FINISH_STAGGER;
        world.timers.schedule(
            delay,
            TimerEvent::FinishingBlow {
                monster_id: monster.id,
            },
        );
    }

    world
        .timers
        .schedule(ENDING_REVEAL_DELAY, TimerEvent::LevelComplete);
}

fn fire_timer(world: &mut World, event: TimerEvent) {
    match event {
        TimerEvent::FinishingBlow { monster_id } => {
            let blow = Attack::damage_only(ENDING_FINISH_DAMAGE);
            let killed = match world.monsters.iter_mut().find(|m| m.id == monster_id) {
                Some(monster) => monster.be_attacked(&blow, &mut world.rng),
                None => false,
            };
            if killed {
                world.push_event(GameEvent::MonsterKilled { id: monster_id });
            }
        }
        TimerEvent::LevelComplete => {
            world.level_complete = true;
            log::info!("Level complete");
            world.push_event(GameEvent::LevelComplete);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::level::{
        CameraRecord, HeroRecord, LevelData, MonsterRecord, TileRecord, UnlockRecord,
    };
    use crate::sim::tile::GridCell;

    const DT: FrameDelta = FrameDelta { seconds: 1.0 / 60.0 };

    fn open_level(hero: (i32, i32)) -> LevelData {
        LevelData {
            hero: HeroRecord { tx: hero.0, ty: hero.1 },
            ..Default::default()
        }
    }

    #[test]
    fn test_hero_stops_at_wall_in_world_step() {
        let mut level = open_level((2, 2));
        level.tiles.push(TileRecord { tx: 3, ty: 2, tag: None });
        let mut world = World::new(Config::default(), &level);
        world.hero.position = Vec2::new(95.5, 80.0);
        world.hero.velocity = Vec2::new(1.0, 0.0);

        tick(&mut world, &TickInput::default(), DT);

        assert_eq!(world.hero.velocity.x, 0.0);
        assert_eq!(world.hero.velocity.y, 0.0);
        assert_eq!(world.hero.position, Vec2::new(95.5, 80.0));
    }

    #[test]
    fn test_camera_falls_back_to_hero_outside_zones() {
        let mut level = open_level((0, 0));
        level.cameras.push(CameraRecord { tx: 0, ty: 0 });
        let config = Config::default();
        let mut world = World::new(config.clone(), &level);
        assert_eq!(world.hero.active_camera, Some(0));

        world.hero.position = Vec2::new(200.0, 150.0);
        tick(&mut world, &TickInput::default(), DT);

        let expected = config.viewport_size() / 2.0 - world.hero.position;
        assert_eq!(world.camera.target, expected);
        assert_eq!(world.hero.active_camera, None);
        // Rendered offset eases toward the target rather than jumping
        assert_ne!(world.camera.offset, expected);
    }

    #[test]
    fn test_camera_smoothing_is_per_step() {
        let mut world = World::new(Config::default(), &open_level((0, 0)));
        world.camera.offset = Vec2::ZERO;
        let target = world.camera.target;
        tick(&mut world, &TickInput::default(), FrameDelta::from_seconds(0.5));
        assert!((world.camera.offset - target * CAMERA_TRANSITION_FRICTION).length() < 1e-4);
    }

    #[test]
    fn test_monster_wakes_when_near_screen() {
        let mut level = open_level((0, 0));
        level.monsters.push(MonsterRecord { tx: 3, ty: 3, ..Default::default() });
        level.monsters.push(MonsterRecord { tx: 100, ty: 100, ..Default::default() });
        let mut world = World::new(Config::default(), &level);

        tick(&mut world, &TickInput::default(), DT);
        let events = world.drain_events();
        assert_eq!(events, vec![GameEvent::MonsterAngered { id: 1 }]);
        assert_eq!(world.monster(1).unwrap().state, AiState::Chasing);
        assert_eq!(world.monster(2).unwrap().state, AiState::Dormant);
    }

    #[test]
    fn test_dev_mode_freezes_monsters() {
        let mut level = open_level((0, 0));
        level.monsters.push(MonsterRecord { tx: 3, ty: 3, ..Default::default() });
        let mut world = World::new(Config::default(), &level);

        tick(&mut world, &TickInput::default().press(Action::DevMode), DT);
        assert_eq!(world.hero.mode, Mode::Dev);
        assert_eq!(world.monsters[0].state, AiState::Dormant);
        assert_eq!(world.drain_events(), vec![GameEvent::ModeChanged(Mode::Dev)]);
    }

    #[test]
    fn test_dev_mode_authors_one_tile_per_cell() {
        let mut world = World::new(Config::default(), &open_level((4, 4)));
        tick(&mut world, &TickInput::default().press(Action::DevMode), DT);
        world.drain_events();

        let held = TickInput::default().hold(Action::Primary);
        tick(&mut world, &held, DT);
        tick(&mut world, &held, DT);

        assert_eq!(world.tiles.len(), 1);
        assert_eq!(world.tiles[0].cell(), (4, 4));
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::TileAuthored { tx: 4, ty: 4 }]
        );
        assert_eq!(world.level_data().tiles.len(), 1);
    }

    #[test]
    fn test_sword_kills_monster_in_front() {
        let mut level = open_level((0, 0));
        level.monsters.push(MonsterRecord { tx: 0, ty: 1, health: Some(1.0), ..Default::default() });
        let mut world = World::new(Config::default(), &level);
        // Facing +y (rotation 0) puts the strike point at (16, 40), inside the monster at (16, 48)
        world.hero.rotation = 0.0;

        tick(&mut world, &TickInput::default().press(Action::Primary), DT);

        assert!(world.monster(1).unwrap().is_dead());
        assert!(world.drain_events().contains(&GameEvent::MonsterKilled { id: 1 }));
    }

    #[test]
    fn test_contact_hurts_hero_once_per_cooldown() {
        let mut level = open_level((5, 5));
        level.monsters.push(MonsterRecord { tx: 5, ty: 5, ..Default::default() });
        let mut world = World::new(Config::default(), &level);
        world.monsters[0].state = AiState::Chasing;
        world.monsters[0].position += Vec2::new(0.0, 10.0);

        tick(&mut world, &TickInput::default(), DT);
        assert_eq!(world.hero.health, HERO_HEALTH - 1.0);
        tick(&mut world, &TickInput::default(), DT);
        assert_eq!(world.hero.health, HERO_HEALTH - 1.0);
        let hurts = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::HeroHurt { .. }))
            .count();
        assert_eq!(hurts, 1);
    }

    #[test]
    fn test_hero_death_respawns_and_resets_monsters() {
        let mut level = open_level((5, 5));
        level.monsters.push(MonsterRecord { tx: 8, ty: 8, ..Default::default() });
        let mut world = World::new(Config::default(), &level);
        world.hero.health = 1.0;
        world.hero.position = Vec2::new(400.0, 400.0);
        world.monsters[0].state = AiState::Chasing;
        world.monsters[0].position = Vec2::new(400.0, 410.0);

        tick(&mut world, &TickInput::default(), DT);

        assert!(world.drain_events().contains(&GameEvent::HeroDied));
        assert_eq!(world.hero.health, HERO_HEALTH);
        assert_eq!(world.hero.cell(32.0), (5, 5));
        assert_eq!(world.monsters[0].position, world.monsters[0].spawn_position);
    }

    #[test]
    fn test_unlock_fires_once() {
        let mut level = open_level((0, 0));
        level.tiles = vec![
            TileRecord { tx: 5, ty: 0, tag: Some("first-shortcut".into()) },
            TileRecord { tx: 5, ty: 1, tag: Some("first-shortcut".into()) },
            TileRecord { tx: 6, ty: 0, tag: None },
        ];
        level.unlocks.push(UnlockRecord { id: "first-shortcut".into(), tx: 1, ty: 0 });
        let mut world = World::new(Config::default(), &level);

        tick(&mut world, &TickInput::default(), DT);
        assert!(world.tiles.iter().all(|t| !t.passable));

        world.hero.position = Vec2::new(48.0, 16.0);
        tick(&mut world, &TickInput::default(), DT);
        assert!(world.tiles[0].passable && !world.tiles[0].visible);
        assert!(world.tiles[1].passable);
        assert!(!world.tiles[2].passable);
        assert_eq!(world.triggers.get("first-shortcut"), Some(&true));

        tick(&mut world, &TickInput::default(), DT);
        let unlocked = world
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Unlocked { .. }))
            .count();
        assert_eq!(unlocked, 1);
    }

    #[test]
    fn test_ending_sequence() {
        let mut level = open_level((0, 0));
        for tx in 2..5 {
            level.monsters.push(MonsterRecord { tx, ty: 8, health: Some(2.0), ..Default::default() });
        }
        let mut world = World::new(Config::default(), &level);
        world.monsters[0].state = AiState::Chasing;
        world.monsters[1].state = AiState::Chasing;
        // Freeze the monsters so only the ending touches them
        world.hero.mode = Mode::Dev;

        tick(&mut world, &TickInput::default(), DT);
        assert!(!world.ending_started);

        world.set_spawner_count(Some(0));
        tick(&mut world, &TickInput::default(), DT);
        assert!(world.ending_started);
        assert_eq!(world.monster(1).unwrap().health, 1.5);
        assert_eq!(world.monster(3).unwrap().health, 2.0);
        assert_eq!(world.timers.len(), 3);

        let step = FrameDelta::from_seconds(0.1);
        let mut elapsed_steps = 0;
        while !world.level_complete && elapsed_steps < 100 {
            tick(&mut world, &TickInput::default(), step);
            elapsed_steps += 1;
        }

        assert!(world.level_complete);
        assert!(world.monster(1).unwrap().is_dead());
        assert!(world.monster(2).unwrap().is_dead());
        assert!(!world.monster(3).unwrap().is_dead());
        // Reveal lands at 3.0s after the ending began
        assert!((29..=31).contains(&elapsed_steps));

        let events = world.drain_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::EndingStarted).count(), 1);
        assert_eq!(events.last(), Some(&GameEvent::LevelComplete));
    }

    #[test]
    fn test_capture_reads_every_action() {
        let source = TickInput::axis(2.0, -0.5)
            .press(Action::Primary)
            .hold(Action::Respawn);
        let captured = TickInput::capture(&source);
        assert_eq!(captured.axis, Vec2::new(1.0, -0.5));
        assert!(captured.is_action_just_pressed(Action::Primary));
        assert!(captured.is_action_down(Action::Respawn));
        assert!(!captured.is_action_just_pressed(Action::Respawn));
    }

    #[test]
    fn test_determinism() {
        // Two worlds with the same seed and inputs end up identical
        let mut level = open_level((0, 0));
        for tx in 1..6 {
            level.monsters.push(MonsterRecord { tx, ty: 3, ..Default::default() });
        }
        level.tiles.push(TileRecord { tx: 3, ty: 1, tag: None });
        let config = Config { seed: 42, ..Default::default() };
        let mut world1 = World::new(config.clone(), &level);
        let mut world2 = World::new(config, &level);

        let inputs = [
            TickInput::axis(1.0, 0.0),
            TickInput::axis(0.0, 1.0).press(Action::Primary),
            TickInput::default(),
            TickInput::axis(-0.7, 0.7),
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut world1, input, DT);
                tick(&mut world2, input, DT);
            }
        }

        assert_eq!(world1.time_steps, world2.time_steps);
        assert_eq!(world1.snapshot(), world2.snapshot());
        for (a, b) in world1.monsters.iter().zip(&world2.monsters) {
            assert_eq!(a.rotation, b.rotation);
        }
    }
}
