//! Power-up pickups and contact damage

use super::state::{DeathCause, GameEvent, GameMode, GameState, PowerupKind};
use super::tick::{begin_nuke, set_mode};
use crate::consts::*;

/// Tick effect timers, then collect every token the player is touching
pub fn update_powerups(state: &mut GameState, dt: f32) {
    state.effects.tick(dt);
    if state.powerups.is_empty() {
        return;
    }

    let reach = PLAYER_RADIUS + POWERUP_RADIUS;
    let player_pos = state.player.pos;
    let mut collected = Vec::new();
    state.powerups.retain(|p| {
        if p.pos.distance_squared(player_pos) < reach * reach {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        apply_powerup(state, kind);
    }
}

/// Apply one collected power-up
pub fn apply_powerup(state: &mut GameState, kind: PowerupKind) {
    log::debug!("Picked up {}", kind.as_str());
    match kind {
        // Timers overwrite rather than stack
        PowerupKind::Adrenaline => state.effects.adrenaline = POWERUP_DURATION,
        PowerupKind::Medkit => {
            state.player.health = (state.player.health + POWERUP_MEDKIT_HEAL).min(MAX_HEALTH);
        }
        PowerupKind::Shield => state.effects.shield = POWERUP_SHIELD_DURATION,
        PowerupKind::Stun => state.effects.stun = POWERUP_STUN_DURATION,
        PowerupKind::Nuke => begin_nuke(state),
    }
}

/// Number of enemies currently touching the player
pub fn count_overlaps(state: &GameState) -> u32 {
    let reach = PLAYER_RADIUS + ENEMY_RADIUS;
    let player_pos = state.player.pos;
    state
        .enemies
        .iter()
        .filter(|e| e.pos.distance_squared(player_pos) < reach * reach)
        .count() as u32
}

/// Contact damage. Every touching enemy deals `DAMAGE_PER_SECOND`, so being
/// surrounded stacks damage with no cap.
pub fn update_damage(state: &mut GameState, dt: f32) {
    let player = &mut state.player;
    if player.invuln_timer > 0.0 || state.effects.shielded() {
        player.invuln_timer = (player.invuln_timer - dt).max(0.0);
        player.clear_contact();
        return;
    }

    let overlaps = count_overlaps(state);
    let player = &mut state.player;
    player.overlaps = overlaps;
    if overlaps == 0 {
        player.hurt_flash_timer = 0.0;
        return;
    }

    // Strobe the flash during sustained contact instead of holding it solid
    player.hurt_flash_timer -= dt;
    let flash = player.hurt_flash_timer <= 0.0;
    if flash {
        player.hurt_flash_timer = HURT_FLASH_COOLDOWN;
    }

    player.health -= DAMAGE_PER_SECOND * dt * overlaps as f32;
    let dead = player.health <= 0.0;

    if flash {
        state.emit(GameEvent::HurtFlash);
    }
    if dead && state.mode != GameMode::GameOver {
        state.death_cause = DeathCause::Zombies;
        set_mode(state, GameMode::GameOver);
    }
}
