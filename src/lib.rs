//! Zombie Arena - A circular arena survival game
//!
//! Core modules:
//! - `sim`: Simulation core (movement, AI, waves, power-ups, game modes)
//! - `questions`: Revive question pool
//! - `best_score`: Best-ever wave/time record
//! - `error`: Data loading errors
//! - `settings`: Persisted preferences and endpoints
//! - `telemetry`: Best-effort revive attempt reporting
//! - `hud`: Read-only snapshot for the presentation layer
//! - `platform`: Browser/native platform abstraction

pub mod best_score;
pub mod error;
pub mod hud;
pub mod platform;
pub mod questions;
pub mod settings;
pub mod sim;
pub mod telemetry;

pub use best_score::BestScore;
pub use error::DataError;
pub use questions::{Question, QuestionPool};
pub use settings::Settings;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Largest frame delta fed to the simulation (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_RADIUS: f32 = 25.0;
    pub const WALL_THICKNESS: f32 = 1.2;
    /// Collision boundary, inset from the wall ring
    pub const ARENA_INNER_RADIUS: f32 = ARENA_RADIUS - WALL_THICKNESS * 0.6;
    /// Random points stay this far inside the arena radius
    pub const ARENA_POINT_MARGIN: f32 = 2.0;
    /// Height every sprite stands at (the simulation itself is planar)
    pub const ENTITY_HEIGHT: f32 = 1.2;

    /// Player movement
    pub const PLAYER_MAX_SPEED: f32 = 24.0;
    pub const ACCELERATION: f32 = 75.0;
    pub const DRAG_WHEN_MOVING: f32 = 2.5;
    pub const FRICTION_WHEN_STOPPING: f32 = 14.0;

    /// Enemy behavior
    pub const ENEMY_MAX_SPEED: f32 = 11.0;
    pub const HOMING_RADIUS: f32 = 3.5;
    pub const WANDER_INTERVAL: f32 = 1.5;
    /// Velocity easing rate toward the desired heading
    pub const ENEMY_TURN_RATE: f32 = 6.0;
    /// Velocity easing rate toward rest while stunned
    pub const STUN_EASE_RATE: f32 = 10.0;

    /// Waves
    pub const WAVE_INTERVAL: f32 = 10.0;
    pub const WAVE_SPAWN_INTERVAL: f32 = 0.3;
    pub const WAVE_BASE_ENEMIES: u32 = 3;
    pub const WAVE_ENEMIES_PER_WAVE: u32 = 2;
    pub const POWERUP_WAVE_CHANCE: f64 = 0.5;

    /// Health and damage
    pub const MAX_HEALTH: f32 = 100.0;
    pub const DAMAGE_PER_SECOND: f32 = 20.0;
    pub const HURT_FLASH_COOLDOWN: f32 = 0.16;
    pub const REVIVE_INVULNERABILITY: f32 = 2.0;
    /// HUD turns red at or below this health
    pub const HEALTH_DANGER: f32 = 25.0;

    /// Power-ups
    pub const POWERUP_DURATION: f32 = 6.0;
    pub const POWERUP_SPEED_MULT: f32 = 1.35;
    pub const POWERUP_MEDKIT_HEAL: f32 = 40.0;
    pub const POWERUP_SHIELD_DURATION: f32 = 3.0;
    pub const POWERUP_STUN_DURATION: f32 = 2.5;
    pub const POWERUP_NUKE_WEIGHT: f32 = 0.2;

    /// Collision radii
    pub const PLAYER_RADIUS: f32 = 1.1;
    pub const ENEMY_RADIUS: f32 = 1.0;
    pub const POWERUP_RADIUS: f32 = 0.9;

    /// Nuke sequence
    pub const NUKE_FREEZE_DURATION: f32 = 0.18;
    pub const NUKE_SHAKE_DURATION: f32 = 0.55;
    pub const NUKE_FADE_DURATION: f32 = 0.42;
    pub const NUKE_SHAKE_INTENSITY: f32 = 1.2;

    /// Fixed chase camera, looking at the arena center
    pub const CAMERA_BASE_POSITION: Vec3 = Vec3::new(32.0, 28.0, 32.0);
}

/// Lift a planar (x, z) position into world space at sprite height
#[inline]
pub fn to_world(pos: Vec2) -> Vec3 {
    Vec3::new(pos.x, consts::ENTITY_HEIGHT, pos.y)
}

/// Camera forward/right flattened onto the ground plane, as planar (x, z) vectors.
///
/// `right` is `forward × up`, matching a right-handed Y-up camera.
pub fn camera_basis(camera_pos: Vec3, look_at: Vec3) -> (Vec2, Vec2) {
    let dir = look_at - camera_pos;
    let forward = Vec2::new(dir.x, dir.z).normalize_or_zero();
    let right = Vec2::new(-forward.y, forward.x);
    (forward, right)
}

/// `exp(-rate * dt)`: multiplicative decay that converges at the same
/// rate no matter how `dt` is sliced
#[inline]
pub fn exp_decay(rate: f32, dt: f32) -> f32 {
    (-rate * dt).exp()
}

/// `1 - exp(-rate * dt)`: lerp factor for frame-rate independent easing
#[inline]
pub fn ease_factor(rate: f32, dt: f32) -> f32 {
    1.0 - exp_decay(rate, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_basis_is_orthonormal() {
        let (forward, right) = camera_basis(consts::CAMERA_BASE_POSITION, Vec3::ZERO);
        assert!((forward.length() - 1.0).abs() < 1e-5);
        assert!((right.length() - 1.0).abs() < 1e-5);
        assert!(forward.dot(right).abs() < 1e-5);
        // Camera sits at +x/+z, so forward points back toward the origin
        assert!(forward.x < 0.0 && forward.y < 0.0);
    }

    #[test]
    fn test_ease_factor_composes() {
        // Two half steps ease exactly as far as one full step
        let full = ease_factor(6.0, 0.1);
        let half = ease_factor(6.0, 0.05);
        let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((full - two_halves).abs() < 1e-6);
    }
}
