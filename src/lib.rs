//! Tilebound - simulation core for a top-down tile dungeon action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hero, monsters, tile collision, camera, world step)
//! - `config`: Session configuration (tile size, viewport, seed)
//! - `level`: Level data records consumed at load and exported for authoring

pub mod config;
pub mod level;
pub mod sim;

pub use config::Config;
pub use level::LevelData;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frames per second the per-frame tuning values were authored against
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Default edge length of a grid cell in world units
    pub const TILE_SIZE: f32 = 32.0;
    /// Default viewport dimensions
    pub const VIEWPORT_WIDTH: f32 = 640.0;
    pub const VIEWPORT_HEIGHT: f32 = 360.0;

    /// Fraction of the remaining distance the camera closes each step
    pub const CAMERA_TRANSITION_FRICTION: f32 = 0.05;

    /// Hero defaults
    pub const GAMEPAD_THRESHOLD: f32 = 0.05;
    pub const HERO_MAX_VELOCITY: f32 = 1.0;
    pub const HERO_FRICTION: f32 = 2.0;
    pub const HERO_RADIUS: f32 = 16.0;
    /// Half-hearts
    pub const HERO_HEALTH: f32 = 6.0;
    /// Distance from the hero centre to the sword strike point
    pub const HERO_ATTACK_REACH: f32 = 24.0;
    pub const HERO_ATTACK_FORCE: f32 = 10.0;
    pub const HERO_ATTACK_DAMAGE: f32 = 1.0;
    /// Knockback applied to the hero when a monster connects
    pub const HERO_KICKBACK_FORCE: f32 = 8.0;

    /// Monster defaults (used when neither rank nor level data override them)
    pub const MONSTER_BASE_RADIUS: f32 = 16.0;
    pub const MONSTER_HEALTH: f32 = 2.0;
    pub const MONSTER_DAMAGE: f32 = 1.0;
    pub const MONSTER_ATTACK_COOLDOWN: f32 = 1.5;
    pub const MONSTER_SPEED: f32 = 0.5;
    pub const MONSTER_SCALE: f32 = 1.0;

    /// Pounce timings (seconds) and dash strength
    pub const POUNCE_STARTUP: f32 = 0.7;
    pub const POUNCE_DURATION: f32 = 0.3;
    pub const POUNCE_COOLDOWN: f32 = 1.0;
    pub const POUNCE_FORCE: f32 = 4.0;
    /// Hero-radius multiplier for contact checks
    pub const HERO_HITBOX_FACTOR: f32 = 0.6;
    /// Pounce trigger range, in contact-radii
    pub const POUNCE_RANGE_FACTOR: f32 = 4.0;

    /// Seconds an entity stays in kickback after taking a hit
    pub const KICKBACK_DURATION: f32 = 0.05;
    /// Rotation jitter divisor: jitter spans [-PI / (2 * STUTTER), PI / (2 * STUTTER)]
    pub const STUTTER: f32 = 12.0;
    /// Number of blood splat variants a dead monster can show
    pub const CORPSE_VARIANTS: u8 = 5;

    /// Win sequence
    pub const ENDING_STUN_FORCE: f32 = 30.0;
    pub const ENDING_STUN_DAMAGE: f32 = 0.5;
    pub const ENDING_FINISH_DAMAGE: f32 = 999.0;
    pub const ENDING_FINISH_DELAY: f32 = 1.5;
    pub const ENDING_FINISH_STAGGER: f32 = 0.1;
    pub const ENDING_REVEAL_DELAY: f32 = 3.0;
}

/// Length of a vector
#[inline]
pub fn magnitude(v: Vec2) -> f32 {
    v.length()
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Facing angle of a vector.
///
/// Angle 0 faces +y (down the screen) and angles grow clockwise on screen, so
/// `direction_from_angle(angle_of(v))` points along `v`.
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    (-v.x).atan2(v.y)
}

/// Unit vector for a facing angle (inverse of [`angle_of`])
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new((-angle).sin(), (-angle).cos())
}

/// Unit vector along `v`, or zero for a degenerate input
#[inline]
pub fn unit_or_zero(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Rescale `v` down to `max` if it is longer
pub fn clamp_magnitude(v: Vec2, max: f32) -> Vec2 {
    let mag = v.length();
    if mag > max && mag > 0.0 {
        v * (max / mag)
    } else {
        v
    }
}
