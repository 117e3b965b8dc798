//! Revive challenge shown on the game over screen
//!
//! One question per death. A correct answer puts the player straight back
//! into the run; a wrong one reveals the solution and locks the revive until
//! the run is restarted.

use super::state::{DeathCause, GameEvent, GameMode, GameState};
use super::tick::set_mode;
use crate::consts::*;
use crate::questions::Question;

/// Revive flow for the current death
#[derive(Debug, Clone, Default)]
pub struct ReviveState {
    /// Question being asked (cleared after a successful revive)
    pub question: Option<Question>,
    /// Set after a wrong answer; only Continue/Restart remain
    pub locked: bool,
    /// Revealed after a wrong answer
    pub solution: Option<String>,
}

/// Draw a fresh question and clear any previous lock
pub fn begin_revive(state: &mut GameState) {
    let question = state.questions.pick(&mut state.rng);
    state.revive = ReviveState {
        question: Some(question),
        locked: false,
        solution: None,
    };
}

/// Judge an answer. Returns `None` when no attempt was possible (not dead,
/// or already locked), otherwise whether the answer was right.
pub fn attempt_revive(state: &mut GameState, answer: &str) -> Option<bool> {
    if state.mode != GameMode::GameOver || state.revive.locked {
        return None;
    }

    let question = state
        .revive
        .question
        .clone()
        .unwrap_or_else(Question::fallback);
    let correct = question.is_correct(answer);
    state.emit(GameEvent::ReviveAttempt {
        question_id: question.id.clone(),
        correct,
    });

    if !correct {
        log::info!("Revive failed");
        state.revive.locked = true;
        state.revive.solution = Some(question.solution_text());
        return Some(false);
    }

    log::info!("Revived");
    let player = &mut state.player;
    player.health = MAX_HEALTH;
    player.invuln_timer = REVIVE_INVULNERABILITY;
    player.clear_contact();
    state.death_cause = DeathCause::Zombies;
    state.revive = ReviveState::default();
    state.whiteout = 0.0;
    set_mode(state, GameMode::Playing);
    Some(true)
}
