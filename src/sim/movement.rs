//! Player steering and enemy AI
//!
//! Both integrate with explicit Euler steps. All damping uses
//! `exp(-rate * dt)` factors so a second of simulation converges the same
//! way whether it arrives as ten frames or a hundred.

use glam::Vec2;

use super::arena::{constrain_to_arena, random_arena_point};
use super::state::{Effects, GameState, Player};
use crate::consts::*;
use crate::{ease_factor, exp_decay};

/// Directional keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    /// (right, forward) axes in -1..=1; opposite keys cancel
    pub fn axes(&self) -> (f32, f32) {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        (axis(self.right, self.left), axis(self.forward, self.back))
    }

    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Project held keys onto the camera's ground-plane basis.
///
/// The result is not normalized; a zero vector means no steering.
pub fn steer_direction(keys: MoveKeys, forward: Vec2, right: Vec2) -> Vec2 {
    let (x, z) = keys.axes();
    right * x + forward * z
}

/// Accelerate, damp, clamp and integrate the player for one step
pub fn update_player(player: &mut Player, effects: &Effects, steer: Vec2, dt: f32) {
    let mult = effects.speed_mult();
    let accel = ACCELERATION * mult;
    let max_speed = PLAYER_MAX_SPEED * mult;

    if steer.length_squared() > 0.0 {
        player.vel += steer.normalize() * accel * dt;
        player.vel *= exp_decay(DRAG_WHEN_MOVING, dt);
    } else {
        player.vel *= exp_decay(FRICTION_WHEN_STOPPING, dt);
    }

    player.vel = player.vel.clamp_length_max(max_speed);

    player.pos += player.vel * dt;
    constrain_to_arena(&mut player.pos, Some(&mut player.vel), PLAYER_RADIUS);
}

/// Wander/homing AI for every enemy.
///
/// While stunned, enemies only bleed off velocity; they neither steer nor move.
pub fn update_enemies(state: &mut GameState, dt: f32) {
    if state.effects.stunned() {
        let ease = ease_factor(STUN_EASE_RATE, dt);
        for enemy in &mut state.enemies {
            enemy.vel = enemy.vel.lerp(Vec2::ZERO, ease);
        }
        return;
    }

    let player_pos = state.player.pos;
    let turn = ease_factor(ENEMY_TURN_RATE, dt);

    for enemy in &mut state.enemies {
        enemy.wander_timer += dt;
        if enemy.wander_timer >= WANDER_INTERVAL {
            enemy.wander_timer = 0.0;
            enemy.wander_target = random_arena_point(&mut state.rng);
        }

        let to_wander = enemy.wander_target - enemy.pos;
        let mut desired = if to_wander.length_squared() > 0.0001 {
            to_wander.normalize()
        } else {
            Vec2::ZERO
        };

        // Close enough to smell the player: drop the wander and chase
        let to_player = player_pos - enemy.pos;
        if to_player.length() < HOMING_RADIUS {
            desired = to_player.normalize_or_zero();
        }

        let target_vel = desired * ENEMY_MAX_SPEED;
        enemy.vel = enemy.vel.lerp(target_vel, turn);
        enemy.pos += enemy.vel * dt;
        constrain_to_arena(&mut enemy.pos, Some(&mut enemy.vel), ENEMY_RADIUS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `steps` equal slices of `total` seconds through the player update
    fn simulate_player(start_vel: Vec2, steer: Vec2, total: f32, steps: u32) -> Player {
        let mut player = Player {
            vel: start_vel,
            ..Default::default()
        };
        let effects = Effects::default();
        let dt = total / steps as f32;
        for _ in 0..steps {
            update_player(&mut player, &effects, steer, dt);
        }
        player
    }

    #[test]
    fn test_axes_cancel() {
        let keys = MoveKeys {
            left: true,
            right: true,
            forward: true,
            ..Default::default()
        };
        assert_eq!(keys.axes(), (0.0, 1.0));
    }

    #[test]
    fn test_steer_uses_camera_basis() {
        let forward = Vec2::new(0.0, -1.0);
        let right = Vec2::new(1.0, 0.0);
        let keys = MoveKeys {
            forward: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(steer_direction(keys, forward, right), Vec2::new(1.0, -1.0));
        assert_eq!(
            steer_direction(MoveKeys::default(), forward, right),
            Vec2::ZERO
        );
    }

    #[test]
    fn test_coasting_is_frame_rate_independent() {
        let coarse = simulate_player(Vec2::new(20.0, 0.0), Vec2::ZERO, 1.0, 10);
        let fine = simulate_player(Vec2::new(20.0, 0.0), Vec2::ZERO, 1.0, 100);
        assert!((coarse.vel - fine.vel).length() < 1e-3);
        assert!(fine.vel.length() < 0.01);
    }

    #[test]
    fn test_held_input_reaches_same_top_speed() {
        let steer = Vec2::new(1.0, 0.0);
        let coarse = simulate_player(Vec2::ZERO, steer, 1.0, 10);
        let fine = simulate_player(Vec2::ZERO, steer, 1.0, 100);
        assert!((coarse.vel.length() - PLAYER_MAX_SPEED).abs() < 0.5);
        assert!((fine.vel.length() - PLAYER_MAX_SPEED).abs() < 0.5);
        assert!((coarse.vel - fine.vel).length() < 0.5);
    }

    #[test]
    fn test_adrenaline_raises_speed_cap() {
        let mut player = Player::default();
        let effects = Effects {
            adrenaline: POWERUP_DURATION,
            ..Default::default()
        };
        for _ in 0..120 {
            update_player(&mut player, &effects, Vec2::new(0.0, 1.0), 1.0 / 120.0);
            // Keep clear of the wall
            player.pos = Vec2::ZERO;
        }
        assert!(player.vel.length() > PLAYER_MAX_SPEED);
        assert!(player.vel.length() <= PLAYER_MAX_SPEED * POWERUP_SPEED_MULT + 1e-3);
    }

    #[test]
    fn test_player_stays_in_arena() {
        let mut player = Player::default();
        let effects = Effects::default();
        for _ in 0..600 {
            update_player(&mut player, &effects, Vec2::new(1.0, 0.3), 1.0 / 60.0);
        }
        assert!(player.pos.length() <= ARENA_INNER_RADIUS - PLAYER_RADIUS + 1e-3);
    }

    fn state_with_enemy(enemy_pos: Vec2, target: Vec2) -> GameState {
        let mut state = GameState::new(3);
        state.powerups.clear();
        state.spawn_enemy();
        let enemy = &mut state.enemies[0];
        enemy.pos = enemy_pos;
        enemy.wander_target = target;
        state
    }

    #[test]
    fn test_enemy_homes_on_nearby_player() {
        // Wander target points away, but the player is inside homing range
        let mut state = state_with_enemy(Vec2::new(2.0, 0.0), Vec2::new(20.0, 0.0));
        update_enemies(&mut state, 1.0 / 60.0);
        assert!(state.enemies[0].vel.x < 0.0);
    }

    #[test]
    fn test_enemy_wanders_when_player_far() {
        let mut state = state_with_enemy(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        update_enemies(&mut state, 1.0 / 60.0);
        let vel = state.enemies[0].vel;
        assert!(vel.y > 0.0 && vel.x.abs() < 1e-4);
    }

    #[test]
    fn test_enemy_easing_is_frame_rate_independent() {
        let run = |steps: u32| {
            let mut state = state_with_enemy(Vec2::new(-10.0, 0.0), Vec2::new(-10.0, 15.0));
            let dt = 0.5 / steps as f32;
            for _ in 0..steps {
                update_enemies(&mut state, dt);
            }
            state.enemies[0].vel
        };
        let coarse = run(10);
        let fine = run(100);
        assert!((coarse - fine).length() < 0.05, "{coarse} vs {fine}");
    }

    #[test]
    fn test_stunned_enemies_stop_without_moving() {
        let mut state = state_with_enemy(Vec2::new(-10.0, 0.0), Vec2::new(0.0, 0.0));
        state.enemies[0].vel = Vec2::new(8.0, 0.0);
        state.effects.stun = POWERUP_STUN_DURATION;
        for _ in 0..60 {
            update_enemies(&mut state, 1.0 / 60.0);
        }
        let enemy = &state.enemies[0];
        assert_eq!(enemy.pos, Vec2::new(-10.0, 0.0));
        assert!(enemy.vel.length() < 8.0 * (-10.0f32).exp() + 1e-4);
    }
}
