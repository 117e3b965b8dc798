//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in one [`GameState`] owned by the
//! caller and passed by `&mut` into every update.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::nuke::NukeSequence;
use super::revive::ReviveState;
use super::waves::WaveState;
use crate::best_score::BestScore;
use crate::consts::*;
use crate::questions::QuestionPool;

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Title screen, nothing simulates
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Dead, waiting on a revive answer or restart
    GameOver,
    /// Nuke cinematic running, gameplay frozen
    Nuking,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Menu => "menu",
            GameMode::Playing => "playing",
            GameMode::Paused => "paused",
            GameMode::GameOver => "gameover",
            GameMode::Nuking => "nuking",
        }
    }
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeathCause {
    #[default]
    Zombies,
    Nuke,
}

impl DeathCause {
    /// Headline shown on the game over overlay
    pub fn headline(&self) -> &'static str {
        match self {
            DeathCause::Zombies => "You were overwhelmed by zombies.",
            DeathCause::Nuke => "You were blown up by a NUKE.",
        }
    }
}

/// The player
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub health: f32,
    /// Post-revive grace period (seconds)
    pub invuln_timer: f32,
    /// Enemies touching the player last tick
    pub overlaps: u32,
    /// Countdown until the hurt flash may retrigger
    pub hurt_flash_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            health: MAX_HEALTH,
            invuln_timer: 0.0,
            overlaps: 0,
            hurt_flash_timer: 0.0,
        }
    }
}

impl Player {
    /// Drop overlap and flash bookkeeping (immunity, revive, nuke)
    pub fn clear_contact(&mut self) {
        self.overlaps = 0;
        self.hurt_flash_timer = 0.0;
    }
}

/// A homing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Random arena point the enemy drifts toward when not homing
    pub wander_target: Vec2,
    pub wander_timer: f32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupKind {
    Adrenaline,
    Medkit,
    Shield,
    Stun,
    Nuke,
}

impl PowerupKind {
    /// Every kind, in roll order
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Adrenaline,
        PowerupKind::Medkit,
        PowerupKind::Shield,
        PowerupKind::Stun,
        PowerupKind::Nuke,
    ];

    /// Relative drop weight
    pub fn weight(&self) -> f32 {
        match self {
            PowerupKind::Nuke => POWERUP_NUKE_WEIGHT,
            _ => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Adrenaline => "adrenaline",
            PowerupKind::Medkit => "medkit",
            PowerupKind::Shield => "shield",
            PowerupKind::Stun => "stun",
            PowerupKind::Nuke => "nuke",
        }
    }
}

/// A power-up token lying in the arena
#[derive(Debug, Clone)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
}

/// Active power-up timers (seconds remaining)
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub adrenaline: f32,
    pub shield: f32,
    pub stun: f32,
}

impl Effects {
    /// Count every timer down, floored at zero
    pub fn tick(&mut self, dt: f32) {
        self.adrenaline = (self.adrenaline - dt).max(0.0);
        self.shield = (self.shield - dt).max(0.0);
        self.stun = (self.stun - dt).max(0.0);
    }

    /// Speed and acceleration multiplier for the player
    pub fn speed_mult(&self) -> f32 {
        if self.adrenaline > 0.0 {
            POWERUP_SPEED_MULT
        } else {
            1.0
        }
    }

    pub fn stunned(&self) -> bool {
        self.stun > 0.0
    }

    pub fn shielded(&self) -> bool {
        self.shield > 0.0
    }
}

/// Things the outside world may want to react to, drained after each tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ModeChanged { from: GameMode, to: GameMode },
    /// Pop the wave line in the HUD
    WaveStarted { wave: u32 },
    /// Restart the hurt flash animation
    HurtFlash,
    /// A revive answer was judged; forwarded to telemetry
    ReviveAttempt {
        question_id: Option<Value>,
        correct: bool,
    },
    /// Persist the new record
    BestScoreImproved(BestScore),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// All gameplay randomness comes from here
    pub rng: Pcg32,
    pub mode: GameMode,
    pub death_cause: DeathCause,
    /// Survival time in seconds (only advances while playing)
    pub elapsed: f32,
    /// Whole second of `elapsed` last offered to the best score
    pub last_best_second: Option<u32>,
    pub player: Player,
    /// Active enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Active power-up tokens (sorted by id)
    pub powerups: Vec<Powerup>,
    pub effects: Effects,
    pub waves: WaveState,
    /// Running nuke cinematic, if any
    pub nuke: Option<NukeSequence>,
    pub revive: ReviveState,
    pub questions: QuestionPool,
    pub best: BestScore,
    /// Camera jitter requested by the nuke sequence (world units)
    pub camera_shake: Vec3,
    /// Full-screen white overlay opacity (0-1)
    pub whiteout: f32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state sitting at the menu
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::Menu,
            death_cause: DeathCause::Zombies,
            elapsed: 0.0,
            last_best_second: None,
            player: Player::default(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            effects: Effects::default(),
            waves: WaveState::default(),
            nuke: None,
            revive: ReviveState::default(),
            questions: QuestionPool::default(),
            best: BestScore::default(),
            camera_shake: Vec3::ZERO,
            whiteout: 0.0,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put everything back to the start of wave 1. Mode is left alone; the
    /// caller decides where to go next. Best score and question pool persist.
    pub fn reset(&mut self) {
        self.enemies.clear();
        self.powerups.clear();
        self.player = Player::default();
        self.effects = Effects::default();
        self.elapsed = 0.0;
        self.last_best_second = None;
        self.death_cause = DeathCause::Zombies;
        self.nuke = None;
        self.revive = ReviveState::default();
        self.camera_shake = Vec3::ZERO;
        self.whiteout = 0.0;
        self.waves = WaveState::default();
        super::waves::start_wave(self);
    }

    /// Spawn an enemy at the spawn point with a fresh wander target
    pub fn spawn_enemy(&mut self) {
        let id = self.next_entity_id();
        let wander_target = super::arena::random_arena_point(&mut self.rng);
        self.enemies.push(Enemy {
            id,
            pos: super::arena::SPAWN_POINT,
            vel: Vec2::ZERO,
            wander_target,
            wander_timer: 0.0,
        });
    }

    /// Place a power-up token
    pub fn spawn_powerup(&mut self, kind: PowerupKind, pos: Vec2) {
        let id = self.next_entity_id();
        log::debug!("Power-up {} spawned", kind.as_str());
        self.powerups.push(Powerup { id, kind, pos });
    }

    /// Queue an event for the platform layer
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Install a freshly loaded question pool
    pub fn set_question_pool(&mut self, pool: QuestionPool) {
        log::info!("Question pool ready ({} questions)", pool.len());
        self.questions = pool;
    }

    /// Offer the current run to the best score, emitting an event on a new record
    pub fn offer_best_score(&mut self) {
        let wave = self.waves.wave;
        if self.best.record(wave, self.elapsed) {
            log::info!("New best: wave {} at {:.1}s", wave, self.elapsed);
            self.emit(GameEvent::BestScoreImproved(self.best));
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.powerups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waits_at_menu() {
        let state = GameState::new(1);
        assert_eq!(state.mode, GameMode::Menu);
        assert_eq!(state.waves.wave, 1);
        assert_eq!(state.waves.spawn_remaining, WAVE_BASE_ENEMIES);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.health, MAX_HEALTH);
    }

    #[test]
    fn test_reset_clears_run_but_keeps_best() {
        let mut state = GameState::new(2);
        state.best = BestScore { wave: 7, time: 80.0 };
        state.spawn_enemy();
        state.player.health = 3.0;
        state.effects.stun = 1.0;
        state.death_cause = DeathCause::Nuke;
        state.reset();
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.health, MAX_HEALTH);
        assert_eq!(state.effects.stun, 0.0);
        assert_eq!(state.death_cause, DeathCause::Zombies);
        assert_eq!(state.best.wave, 7);
    }

    #[test]
    fn test_effects_floor_at_zero() {
        let mut effects = Effects {
            adrenaline: 0.05,
            shield: 1.0,
            stun: 0.0,
        };
        effects.tick(0.1);
        assert_eq!(effects.adrenaline, 0.0);
        assert!((effects.shield - 0.9).abs() < 1e-6);
        assert_eq!(effects.stun, 0.0);
        assert_eq!(effects.speed_mult(), 1.0);
    }
}
