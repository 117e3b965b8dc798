//! Per-frame simulation tick and mode transitions
//!
//! The tick is driven by the measured frame delta. Player actions (start,
//! pause, revive, ...) arrive separately through [`apply_action`].

use glam::{Vec2, Vec3};

use super::movement::{MoveKeys, steer_direction, update_enemies, update_player};
use super::nuke::{NukeSequence, NukeStep, advance};
use super::resolve::{update_damage, update_powerups};
use super::revive::{attempt_revive, begin_revive};
use super::state::{DeathCause, GameEvent, GameMode, GameState};
use super::waves::update_spawning;
use crate::camera_basis;
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Movement keys held
    pub keys: MoveKeys,
    /// Camera forward on the ground plane (x, z)
    pub camera_forward: Vec2,
    /// Camera right on the ground plane (x, z)
    pub camera_right: Vec2,
}

impl Default for TickInput {
    fn default() -> Self {
        let (camera_forward, camera_right) = camera_basis(CAMERA_BASE_POSITION, Vec3::ZERO);
        Self {
            keys: MoveKeys::default(),
            camera_forward,
            camera_right,
        }
    }
}

impl TickInput {
    pub fn with_keys(keys: MoveKeys) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }
}

/// Discrete player commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the menu and begin a run
    Start,
    Pause,
    /// Window lost focus
    FocusLost,
    Resume,
    /// Abandon the run and return to the title screen
    Menu,
    /// Fresh run from any mode
    Restart,
    /// Restart after a failed revive
    Continue,
    /// Submit an answer to the revive question
    Revive(String),
}

/// Switch modes, running the entry behavior of the new mode
pub fn set_mode(state: &mut GameState, mode: GameMode) {
    let from = state.mode;
    state.mode = mode;

    match mode {
        GameMode::GameOver => {
            state.nuke = None;
            state.camera_shake = Vec3::ZERO;
            begin_revive(state);
        }
        GameMode::Playing => state.camera_shake = Vec3::ZERO,
        GameMode::Menu | GameMode::Paused | GameMode::Nuking => {}
    }

    if from != mode {
        log::info!("Mode: {} -> {}", from.as_str(), mode.as_str());
        state.emit(GameEvent::ModeChanged { from, to: mode });
    }
}

/// Nuke collected: wipe the arena and start the cinematic
pub fn begin_nuke(state: &mut GameState) {
    log::info!("NUKE");
    state.death_cause = DeathCause::Nuke;
    state.enemies.clear();

    let player = &mut state.player;
    player.vel = Vec2::ZERO;
    player.invuln_timer = 0.0;
    player.clear_contact();
    state.effects.shield = 0.0;
    state.effects.stun = 0.0;

    state.nuke = Some(NukeSequence::start());
    state.camera_shake = Vec3::ZERO;
    state.whiteout = 0.0;
    set_mode(state, GameMode::Nuking);
}

/// Full reset into a new run
fn restart(state: &mut GameState) {
    state.reset();
    set_mode(state, GameMode::Playing);
}

/// Apply a player command. Commands that make no sense in the current mode
/// are ignored.
pub fn apply_action(state: &mut GameState, action: Action) {
    match action {
        Action::Start => {
            if state.mode == GameMode::Menu {
                restart(state);
            }
        }
        Action::Pause | Action::FocusLost => {
            if state.mode == GameMode::Playing {
                set_mode(state, GameMode::Paused);
            }
        }
        Action::Resume => {
            if state.mode == GameMode::Paused {
                set_mode(state, GameMode::Playing);
            }
        }
        Action::Menu => {
            state.reset();
            set_mode(state, GameMode::Menu);
        }
        Action::Restart => restart(state),
        Action::Continue => {
            if state.mode == GameMode::GameOver && state.revive.locked {
                restart(state);
            }
        }
        Action::Revive(answer) => {
            attempt_revive(state, &answer);
        }
    }
}

/// Advance the game by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    match state.mode {
        GameMode::Playing => tick_playing(state, input, dt),
        GameMode::Nuking => tick_nuke(state, dt),
        GameMode::Menu | GameMode::Paused | GameMode::GameOver => {}
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    state.elapsed += dt;
    let second = state.elapsed.floor() as u32;
    if state.last_best_second != Some(second) {
        state.last_best_second = Some(second);
        state.offer_best_score();
    }

    let steer = steer_direction(input.keys, input.camera_forward, input.camera_right);
    update_player(&mut state.player, &state.effects, steer, dt);
    update_enemies(state, dt);
    update_spawning(state, dt);
    update_powerups(state, dt);

    // A nuke pickup above already ended normal play
    if state.mode == GameMode::Playing {
        update_damage(state, dt);
    }

    state.normalize_order();
}

fn tick_nuke(state: &mut GameState, dt: f32) {
    let Some(seq) = state.nuke else {
        set_mode(state, GameMode::GameOver);
        return;
    };

    match advance(seq, dt) {
        NukeStep::Running(next) => {
            state.nuke = Some(next);
            state.camera_shake = next.camera_jitter(&mut state.rng);
            state.whiteout = next.fade_progress();
        }
        NukeStep::Done => {
            state.whiteout = 1.0;
            set_mode(state, GameMode::GameOver);
        }
    }
}
