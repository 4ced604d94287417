//! The player-controlled hero
//!
//! Movement is velocity-driven: stick input sets the velocity outright, walls zero the blocked
//! axis, and friction divides what is left every step so the hero glides to a stop once the
//! stick is released.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::slide_against_tiles;
use super::monster::Strike;
use super::tick::{Action, FrameDelta, InputSource};
use super::tile::{CameraZone, GridCell, Tile, cell_of};
use crate::consts::*;
use crate::{angle_of, direction_from_angle, magnitude, unit_or_zero};

/// Play mode vs. level-authoring mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Game,
    /// Walls are ignored, the camera follows the hero, and the primary action places tiles
    Dev,
}

/// What the hero asked the world to do this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeroActions {
    /// Sword swing (game mode)
    pub swing: bool,
    /// Place a tile under the hero (dev mode)
    pub author_tile: bool,
    /// Refill health in place and reset monsters (dev mode)
    pub respawn: bool,
    pub mode_changed: Option<Mode>,
}

/// The hero entity
#[derive(Debug, Clone)]
pub struct Hero {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub radius: f32,
    pub max_velocity: f32,
    pub friction: f32,
    pub mode: Mode,
    /// Index of the camera zone currently holding focus
    pub active_camera: Option<usize>,
    /// Half-hearts
    pub health: f32,
    /// Seconds of protection left after a hit
    pub hurt_cooldown: f32,
    pub kickback_cooldown: f32,
    pub spawn_cell: (i32, i32),
    pub spawn_position: Vec2,
}

impl Hero {
    pub fn new(spawn_cell: (i32, i32), tile_size: f32) -> Self {
        let spawn_position = Vec2::new(
            (spawn_cell.0 as f32 + 0.5) * tile_size,
            (spawn_cell.1 as f32 + 0.5) * tile_size,
        );
        Self {
            position: spawn_position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            radius: HERO_RADIUS,
            max_velocity: HERO_MAX_VELOCITY,
            friction: HERO_FRICTION,
            mode: Mode::Game,
            active_camera: None,
            health: HERO_HEALTH,
            hurt_cooldown: 0.0,
            kickback_cooldown: 0.0,
            spawn_cell,
            spawn_position,
        }
    }

    /// Grid cell under the hero
    #[inline]
    pub fn cell(&self, tile_size: f32) -> (i32, i32) {
        cell_of(self.position, tile_size)
    }

    /// Unit vector the hero is facing
    #[inline]
    pub fn facing(&self) -> Vec2 {
        direction_from_angle(self.rotation)
    }

    /// Where the sword lands if swung now
    pub fn strike_point(&self) -> Vec2 {
        self.position + self.facing() * HERO_ATTACK_REACH
    }

    /// Advance one step: input, walls, integration, friction
    pub fn update<I: InputSource + ?Sized>(
        &mut self,
        input: &I,
        delta: FrameDelta,
        tiles: &[Tile],
    ) -> HeroActions {
        let mut actions = HeroActions::default();

        let stick = Vec2::new(input.axis_x(), input.axis_y());
        if self.kickback_cooldown > 0.0 {
            self.kickback_cooldown -= delta.seconds;
        } else if magnitude(stick) > GAMEPAD_THRESHOLD {
            self.rotation = angle_of(stick);
            self.velocity = stick * self.max_velocity * delta.frames();
        }

        if input.is_action_just_pressed(Action::GameMode) && self.mode != Mode::Game {
            self.mode = Mode::Game;
            actions.mode_changed = Some(Mode::Game);
        }
        if input.is_action_just_pressed(Action::DevMode) && self.mode != Mode::Dev {
            self.mode = Mode::Dev;
            actions.mode_changed = Some(Mode::Dev);
        }

        if self.mode == Mode::Game {
            self.velocity = slide_against_tiles(self.position, self.velocity, tiles).velocity;
        }

        self.position += self.velocity;
        self.velocity *= 1.0 / self.friction;

        if self.hurt_cooldown > 0.0 {
            self.hurt_cooldown = (self.hurt_cooldown - delta.seconds).max(0.0);
        }

        match self.mode {
            Mode::Game => {
                actions.swing = input.is_action_just_pressed(Action::Primary);
            }
            Mode::Dev => {
                actions.author_tile = input.is_action_down(Action::Primary);
                actions.respawn = input.is_action_just_pressed(Action::Respawn);
            }
        }

        actions
    }

    /// Point the camera should centre on.
    ///
    /// Sticks with the current zone while the hero stays in it, otherwise takes the first zone
    /// (in collection order) containing the hero, otherwise the hero itself. Dev mode always
    /// follows the hero.
    pub fn choose_focus(&mut self, cameras: &[CameraZone]) -> Vec2 {
        if self.mode == Mode::Dev {
            return self.position;
        }

        if let Some(zone) = self.active_camera.and_then(|i| cameras.get(i)) {
            if zone.contains_point(self.position) {
                return zone.focus_point();
            }
        }

        self.active_camera = cameras.iter().position(|zone| zone.contains_point(self.position));
        self.active_camera
            .and_then(|i| cameras.get(i))
            .map_or(self.position, CameraZone::focus_point)
    }

    /// Take a monster's hit. Returns false while still protected from the last one.
    pub fn be_attacked(&mut self, strike: &Strike) -> bool {
        if self.hurt_cooldown > 0.0 {
            return false;
        }
        self.health -= strike.damage;
        self.hurt_cooldown = strike.cooldown;
        self.kickback_cooldown = KICKBACK_DURATION;
        self.velocity = unit_or_zero(self.position - strike.from) * HERO_KICKBACK_FORCE;
        true
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Full health, no lingering hit state, at `position`
    pub fn revive_at(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.health = HERO_HEALTH;
        self.hurt_cooldown = 0.0;
        self.kickback_cooldown = 0.0;
        self.active_camera = None;
    }

    /// Back to the spawn cell at full health
    pub fn respawn(&mut self) {
        self.revive_at(self.spawn_position);
    }
}
