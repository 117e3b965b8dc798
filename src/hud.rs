//! Read-only view of the game for the presentation layer
//!
//! Built once per frame from [`GameState`] and handed to the page as JSON.
//! Nothing here feeds back into the simulation.

use glam::Vec3;
use serde::Serialize;

use crate::consts::*;
use crate::questions::QuestionKind;
use crate::sim::{GameMode, GameState, PowerupKind};
use crate::to_world;

/// Accent color per wave, cycling
pub const WAVE_COLORS: [&str; 8] = [
    "#6ee7ff", "#a78bfa", "#34d399", "#fbbf24", "#fb7185", "#60a5fa", "#f472b6", "#22d3ee",
];

const TIP_ANSWER: &str = "Tip: press Enter to revive • press R to restart";
const TIP_CHOICE: &str = "Tip: click an answer • press R to restart";
const TIP_LOCKED: &str = "Tip: press Enter to continue (restart)";

/// `MM:SS`, truncating partial seconds
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Remaining effect time, e.g. `3.4s`
pub fn format_timer(seconds: f32) -> String {
    format!("{:.1}s", seconds.max(0.0))
}

pub fn wave_color(wave: u32) -> &'static str {
    WAVE_COLORS[(wave.max(1) - 1) as usize % WAVE_COLORS.len()]
}

/// Active effect timers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsView {
    pub adrenaline: String,
    pub shield: String,
    pub stun: String,
    pub adrenaline_active: bool,
    pub shield_active: bool,
    pub stun_active: bool,
}

/// Revive panel contents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviveView {
    pub prompt: String,
    /// Buttons to show (empty for free-text questions or once locked)
    pub choices: Vec<String>,
    /// Show the answer box
    pub free_text: bool,
    /// Answer box should offer a numeric keypad
    pub numeric: bool,
    pub tip: &'static str,
    pub solution: Option<String>,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerupView {
    pub kind: PowerupKind,
    pub pos: Vec3,
}

/// Everything the page needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudSnapshot {
    pub mode: GameMode,
    pub wave: u32,
    pub wave_color: &'static str,
    /// Whole health points, never negative
    pub health: u32,
    pub health_danger: bool,
    pub time: String,
    pub best_wave: String,
    pub best_time: String,
    pub effects: EffectsView,
    pub death_headline: Option<&'static str>,
    pub revive: Option<ReviveView>,
    /// Offset to add to the base camera position
    pub camera_shake: Vec3,
    pub whiteout: f32,
    pub player: Vec3,
    pub enemies: Vec<Vec3>,
    pub powerups: Vec<PowerupView>,
}

impl HudSnapshot {
    pub fn new(state: &GameState) -> Self {
        let effects = &state.effects;
        let best = &state.best;
        let game_over = state.mode == GameMode::GameOver;

        Self {
            mode: state.mode,
            wave: state.waves.wave,
            wave_color: wave_color(state.waves.wave),
            health: state.player.health.max(0.0).floor() as u32,
            health_danger: state.player.health <= HEALTH_DANGER,
            time: format_time(state.elapsed),
            best_wave: if best.wave > 0 {
                best.wave.to_string()
            } else {
                "-".to_string()
            },
            best_time: if best.time > 0.0 {
                format_time(best.time)
            } else {
                "--:--".to_string()
            },
            effects: EffectsView {
                adrenaline: format_timer(effects.adrenaline),
                shield: format_timer(effects.shield),
                stun: format_timer(effects.stun),
                adrenaline_active: effects.adrenaline > 0.0,
                shield_active: effects.shielded(),
                stun_active: effects.stunned(),
            },
            death_headline: game_over.then(|| state.death_cause.headline()),
            revive: if game_over {
                Some(revive_view(state))
            } else {
                None
            },
            camera_shake: state.camera_shake,
            whiteout: state.whiteout,
            player: to_world(state.player.pos),
            enemies: state.enemies.iter().map(|e| to_world(e.pos)).collect(),
            powerups: state
                .powerups
                .iter()
                .map(|p| PowerupView {
                    kind: p.kind,
                    pos: to_world(p.pos),
                })
                .collect(),
        }
    }

    /// Snapshot with camera shake suppressed (reduced motion)
    pub fn without_shake(mut self) -> Self {
        self.camera_shake = Vec3::ZERO;
        self
    }
}

fn revive_view(state: &GameState) -> ReviveView {
    let revive = &state.revive;
    let (prompt, kind, choices, fallback) = match &revive.question {
        Some(q) => (q.prompt.clone(), q.kind, q.choices.clone(), q.is_fallback()),
        None => (String::new(), QuestionKind::Short, Vec::new(), true),
    };

    if revive.locked {
        return ReviveView {
            prompt,
            choices: Vec::new(),
            free_text: false,
            numeric: false,
            tip: TIP_LOCKED,
            solution: revive.solution.clone(),
            locked: true,
        };
    }

    match kind {
        QuestionKind::MultipleChoice => ReviveView {
            prompt,
            choices,
            free_text: false,
            numeric: false,
            tip: TIP_CHOICE,
            solution: None,
            locked: false,
        },
        QuestionKind::Short => ReviveView {
            prompt,
            choices: Vec::new(),
            free_text: true,
            numeric: fallback,
            tip: TIP_ANSWER,
            solution: None,
            locked: false,
        },
    }
}
