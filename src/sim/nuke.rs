//! Nuke cinematic: freeze, shake, fade to white
//!
//! The sequence is a tiny state machine advanced by [`advance`], a pure
//! function of (phase, elapsed, dt). Time left over when a phase ends is
//! carried into the next one, so the whole sequence always lasts exactly
//! `NUKE_FREEZE_DURATION + NUKE_SHAKE_DURATION + NUKE_FADE_DURATION`.

use glam::Vec3;
use rand::Rng;

use crate::consts::*;

/// Sub-phase of the nuke sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NukePhase {
    /// Camera held still for a beat
    Freeze,
    /// Full-strength camera shake
    Shake,
    /// Shake winds down while the screen goes white
    Fade,
}

impl NukePhase {
    pub fn duration(&self) -> f32 {
        match self {
            NukePhase::Freeze => NUKE_FREEZE_DURATION,
            NukePhase::Shake => NUKE_SHAKE_DURATION,
            NukePhase::Fade => NUKE_FADE_DURATION,
        }
    }

    pub fn next(&self) -> Option<NukePhase> {
        match self {
            NukePhase::Freeze => Some(NukePhase::Shake),
            NukePhase::Shake => Some(NukePhase::Fade),
            NukePhase::Fade => None,
        }
    }
}

/// Running sequence: current phase and seconds spent in it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NukeSequence {
    pub phase: NukePhase,
    pub elapsed: f32,
}

/// Result of advancing the sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NukeStep {
    Running(NukeSequence),
    /// Fade finished; time to show the game over screen
    Done,
}

impl NukeSequence {
    pub fn start() -> Self {
        Self {
            phase: NukePhase::Freeze,
            elapsed: 0.0,
        }
    }

    /// Fade progress 0-1 (zero outside the fade phase)
    pub fn fade_progress(&self) -> f32 {
        match self.phase {
            NukePhase::Fade => (self.elapsed / NUKE_FADE_DURATION).min(1.0),
            _ => 0.0,
        }
    }

    /// Maximum camera displacement this frame
    pub fn shake_intensity(&self) -> f32 {
        match self.phase {
            NukePhase::Freeze => 0.0,
            NukePhase::Shake => NUKE_SHAKE_INTENSITY,
            NukePhase::Fade => NUKE_SHAKE_INTENSITY * (1.0 - self.fade_progress()) * 0.9,
        }
    }

    /// Random camera offset bounded by the current intensity (vertical axis damped)
    pub fn camera_jitter<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let intensity = self.shake_intensity();
        if intensity <= 0.0 {
            return Vec3::ZERO;
        }
        let mut jitter = || rng.random::<f32>() * 2.0 - 1.0;
        Vec3::new(
            jitter() * intensity,
            jitter() * intensity * 0.55,
            jitter() * intensity,
        )
    }
}

/// Advance a sequence by `dt`
pub fn advance(seq: NukeSequence, dt: f32) -> NukeStep {
    let mut phase = seq.phase;
    let mut elapsed = seq.elapsed + dt;
    while elapsed >= phase.duration() {
        match phase.next() {
            Some(next) => {
                elapsed -= phase.duration();
                phase = next;
            }
            None => return NukeStep::Done,
        }
    }
    NukeStep::Running(NukeSequence { phase, elapsed })
}
