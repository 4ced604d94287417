//! Monsters: activation, pursuit, and the pounce attack
//!
//! A monster sleeps (`Dormant`) until it first comes near the screen, then chases the hero
//! for the rest of the session. Close to the hero it winds up (`ReadyToPounce`), dashes along
//! the direction it locked in (`Pouncing`), and rests (`CoolingDown`) before chasing again.
//!
//! Taking a hit knocks the monster back for a moment, cancels any pounce in progress and
//! freezes the pounce timers until the knockback wears off. Steering and tile collision keep
//! running during knockback; only the timers stop.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::camera::ViewRect;
use super::collision::{circle_contains, slide_against_tiles};
use super::tile::Tile;
use crate::consts::*;
use crate::level::{AttackRecord, MonsterRecord};
use crate::{angle_of, clamp_magnitude, direction_from_angle, distance, unit_or_zero};

/// Preset stat blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Grunt,
    Warrior,
    Tank,
    Elite,
    /// Stats come from level data
    #[default]
    Custom,
}

/// Stats a rank forces, overriding level data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankPreset {
    pub max_velocity: f32,
    pub scale: f32,
    pub damage: f32,
    pub health: f32,
}

impl Rank {
    pub fn preset(self) -> Option<RankPreset> {
        let (max_velocity, scale, damage, health) = match self {
            Rank::Grunt => (1.0, 0.5, 1.0, 1.0),
            Rank::Warrior => (0.5, 0.8, 1.0, 1.0),
            Rank::Tank => (0.5, 1.25, 1.0, 2.0),
            Rank::Elite => (0.5, 1.8, 2.0, 2.0),
            Rank::Custom => return None,
        };
        Some(RankPreset {
            max_velocity,
            scale,
            damage,
            health,
        })
    }
}

/// AI state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// Not yet seen; does nothing but watch for the screen edge
    Dormant,
    Chasing,
    /// Standing still, about to dash
    ReadyToPounce,
    Pouncing,
    CoolingDown,
    Dead,
}

/// A monster's own attack stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackStats {
    /// Half-hearts
    pub damage: f32,
    /// Seconds the hero is protected after being hit
    pub cooldown: f32,
}

/// A hit landing on a monster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attack {
    /// Facing angle the knockback pushes along (see [`direction_from_angle`])
    pub direction: f32,
    pub force: f32,
    pub damage: f32,
}

impl Attack {
    /// A hit with no knockback
    pub fn damage_only(damage: f32) -> Self {
        Self {
            direction: 0.0,
            force: 0.0,
            damage,
        }
    }
}

/// A monster landing a hit on the hero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub damage: f32,
    pub cooldown: f32,
    /// Attacker position, for knockback
    pub from: Vec2,
}

/// How a dead monster is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corpse {
    pub alpha: f32,
    pub variant: u8,
}

/// What a monster can see of the world during its update
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub hero_position: Vec2,
    pub hero_radius: f32,
    pub tiles: &'a [Tile],
    /// Screen rectangle plus a one-tile margin
    pub view: ViewRect,
}

/// A monster entity
#[derive(Debug, Clone)]
pub struct Monster {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub radius: f32,
    pub scale: f32,
    pub rank: Rank,
    pub health: f32,
    pub spawn_health: f32,
    pub attack: AttackStats,
    pub max_velocity: f32,
    pub state: AiState,
    pub since_startup: f32,
    pub since_duration: f32,
    pub since_cooldown: f32,
    pub kickback_cooldown: f32,
    pub pounce_vector: Vec2,
    /// Spawn cell (tx, ty)
    pub spawn_cell: (i32, i32),
    pub spawn_position: Vec2,
    pub corpse: Option<Corpse>,
}

fn positive_or(value: Option<f32>, default: f32) -> f32 {
    value.filter(|v| *v > 0.0).unwrap_or(default)
}

impl Monster {
    /// Build a monster from its spawn record; ranks override per-field values
    pub fn from_record(id: u32, record: &MonsterRecord, tile_size: f32) -> Self {
        let attack = record.attack.unwrap_or_default();
        let mut health = positive_or(record.health, MONSTER_HEALTH);
        let mut damage = positive_or(attack.damage, MONSTER_DAMAGE);
        let cooldown = positive_or(attack.cooldown, MONSTER_ATTACK_COOLDOWN);
        let mut scale = positive_or(record.scale, MONSTER_SCALE);
        let mut max_velocity = positive_or(record.speed, MONSTER_SPEED);

        let rank = record.rank.unwrap_or_default();
        if let Some(preset) = rank.preset() {
            max_velocity = preset.max_velocity;
            scale = preset.scale;
            damage = preset.damage;
            health = preset.health;
        }

        let spawn_position = Vec2::new(
            (record.tx as f32 + 0.5) * tile_size,
            (record.ty as f32 + 0.5) * tile_size,
        );

        Self {
            id,
            position: spawn_position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            radius: MONSTER_BASE_RADIUS * scale,
            scale,
            rank,
            health,
            spawn_health: health,
            attack: AttackStats { damage, cooldown },
            max_velocity,
            state: AiState::Dormant,
            since_startup: 0.0,
            since_duration: 0.0,
            since_cooldown: 0.0,
            kickback_cooldown: 0.0,
            pounce_vector: Vec2::ZERO,
            spawn_cell: (record.tx, record.ty),
            spawn_position,
            corpse: None,
        }
    }

    /// Spawn-form record for level export
    pub fn record(&self) -> MonsterRecord {
        let (tx, ty) = self.spawn_cell;
        MonsterRecord {
            tx,
            ty,
            health: Some(self.spawn_health),
            attack: Some(AttackRecord {
                damage: Some(self.attack.damage),
                cooldown: Some(self.attack.cooldown),
            }),
            scale: Some(self.scale),
            speed: Some(self.max_velocity),
            rank: (self.rank != Rank::Custom).then_some(self.rank),
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == AiState::Dead
    }

    /// Has been activated and is still alive
    #[inline]
    pub fn is_angered(&self) -> bool {
        !matches!(self.state, AiState::Dormant | AiState::Dead)
    }

    /// Winding up or mid-dash (drawn tinted)
    #[inline]
    pub fn is_telegraphing(&self) -> bool {
        matches!(self.state, AiState::ReadyToPounce | AiState::Pouncing)
    }

    #[inline]
    pub fn in_kickback(&self) -> bool {
        self.kickback_cooldown > 0.0
    }

    /// Hit test for the hero's sword
    pub fn contains_point(&self, point: Vec2) -> bool {
        circle_contains(self.position, self.radius, point)
    }

    /// Advance one step. Returns a strike if the monster touched the hero.
    pub fn update<R: Rng>(
        &mut self,
        env: &Surroundings<'_>,
        rng: &mut R,
        dt: f32,
    ) -> Option<Strike> {
        match self.state {
            AiState::Dead => return None,
            AiState::Dormant => {
                if env.view.contains(self.position) {
                    self.state = AiState::Chasing;
                    log::debug!("monster {} angered at {:?}", self.id, self.position);
                }
                return None;
            }
            _ => {}
        }

        let to_hero = env.hero_position - self.position;
        let toward_hero = unit_or_zero(to_hero);

        if self.state == AiState::Chasing && !self.in_kickback() {
            self.rotation = angle_of(to_hero);
            self.velocity = clamp_magnitude(toward_hero * self.max_velocity, self.max_velocity);
        }

        self.velocity = slide_against_tiles(self.position, self.velocity, env.tiles).velocity;

        let mut strike = None;
        if !matches!(self.state, AiState::ReadyToPounce | AiState::CoolingDown) {
            let contact = env.hero_radius * HERO_HITBOX_FACTOR;
            let gap = distance(self.position, env.hero_position);
            if gap < self.radius + contact * POUNCE_RANGE_FACTOR {
                if self.state == AiState::Chasing && !self.in_kickback() {
                    self.ready_to_pounce(toward_hero);
                }
                if gap < self.radius + contact {
                    strike = Some(Strike {
                        damage: self.attack.damage,
                        cooldown: self.attack.cooldown,
                        from: self.position,
                    });
                    self.velocity = Vec2::ZERO;
                }
            }
        }

        if self.state == AiState::Chasing {
            let span = std::f32::consts::PI / STUTTER;
            self.rotation += rng.random::<f32>() * span - span / 2.0;
        }

        self.position += self.velocity;

        if self.in_kickback() {
            self.kickback_cooldown -= dt;
            if self.kickback_cooldown <= 0.0 {
                self.velocity = Vec2::ZERO;
            }
        } else {
            self.advance_timers(dt);
        }

        strike
    }

    fn advance_timers(&mut self, dt: f32) {
        match self.state {
            AiState::ReadyToPounce => {
                self.since_startup += dt;
                if self.since_startup >= POUNCE_STARTUP {
                    self.pounce();
                }
            }
            AiState::Pouncing => {
                self.since_duration += dt;
                if self.since_duration >= POUNCE_DURATION {
                    self.begin_cooldown();
                }
            }
            AiState::CoolingDown => {
                self.since_cooldown += dt;
                if self.since_cooldown >= POUNCE_COOLDOWN {
                    self.state = AiState::Chasing;
                }
            }
            _ => {}
        }
    }

    /// Lock in a dash direction and stand still
    pub fn ready_to_pounce(&mut self, direction: Vec2) {
        self.state = AiState::ReadyToPounce;
        self.since_startup = 0.0;
        self.pounce_vector = direction;
        self.velocity = Vec2::ZERO;
    }

    fn pounce(&mut self) {
        self.state = AiState::Pouncing;
        self.since_duration = 0.0;
        self.velocity = self.pounce_vector * POUNCE_FORCE;
        log::debug!("monster {} pounces along {:?}", self.id, self.pounce_vector);
    }

    fn begin_cooldown(&mut self) {
        self.state = AiState::CoolingDown;
        self.since_cooldown = 0.0;
        self.velocity = Vec2::ZERO;
    }

    fn leave_pounce_states(&mut self) {
        if matches!(
            self.state,
            AiState::ReadyToPounce | AiState::Pouncing | AiState::CoolingDown
        ) {
            self.state = AiState::Chasing;
        }
    }

    /// Take a hit. Returns true if it killed the monster. Dead monsters ignore hits.
    pub fn be_attacked<R: Rng>(&mut self, attack: &Attack, rng: &mut R) -> bool {
        if self.is_dead() {
            return false;
        }

        self.velocity = direction_from_angle(attack.direction) * attack.force;
        self.kickback_cooldown = KICKBACK_DURATION;
        self.leave_pounce_states();

        self.health -= attack.damage;
        if self.health <= 0.0 {
            self.die(rng);
            return true;
        }
        false
    }

    fn die<R: Rng>(&mut self, rng: &mut R) {
        self.state = AiState::Dead;
        self.velocity = Vec2::ZERO;
        self.kickback_cooldown = 0.0;
        self.rotation = rng.random::<f32>() * std::f32::consts::TAU;
        self.corpse = Some(Corpse {
            alpha: rng.random::<f32>() * 0.5 + 0.5,
            variant: rng.random_range(0..CORPSE_VARIANTS),
        });
        log::debug!("monster {} died at {:?}", self.id, self.position);
    }

    /// Back to spawn: full health, dormant, no pending timers
    pub fn reset(&mut self) {
        self.health = self.spawn_health;
        self.state = AiState::Dormant;
        self.since_startup = 0.0;
        self.since_duration = 0.0;
        self.since_cooldown = 0.0;
        self.kickback_cooldown = 0.0;
        self.pounce_vector = Vec2::ZERO;
        self.corpse = None;
        self.position = self.spawn_position;
        self.velocity = Vec2::ZERO;
        self.rotation = 0.0;
    }
}
