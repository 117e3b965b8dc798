//! Wave progression and spawn scheduling
//!
//! A new wave begins every `WAVE_INTERVAL` seconds regardless of how many
//! enemies are still alive. Each wave trickles its quota of enemies in from
//! the spawn point one `WAVE_SPAWN_INTERVAL` apart, and has a coin-flip
//! chance of dropping a single power-up somewhere in the arena.

use rand::Rng;

use super::arena::random_arena_point;
use super::state::{GameEvent, GameState, PowerupKind};
use crate::consts::*;

/// Wave counters
#[derive(Debug, Clone)]
pub struct WaveState {
    /// Current wave number (1-based)
    pub wave: u32,
    /// Seconds into the current wave
    pub wave_timer: f32,
    /// Enemies still to spawn this wave
    pub spawn_remaining: u32,
    /// Seconds since the last enemy spawn
    pub spawn_timer: f32,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            wave: 1,
            wave_timer: 0.0,
            spawn_remaining: 0,
            spawn_timer: 0.0,
        }
    }
}

/// What the scheduler wants done this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveStep {
    /// A new wave began (counters already reset)
    pub wave_started: bool,
    /// Enemies to create at the spawn point
    pub spawns: u32,
}

/// Enemy quota for a wave: 3, 5, 7, ...
pub fn enemies_for_wave(wave: u32) -> u32 {
    WAVE_BASE_ENEMIES + wave.saturating_sub(1) * WAVE_ENEMIES_PER_WAVE
}

impl WaveState {
    /// Reset the per-wave counters for the current wave number
    pub fn begin(&mut self) {
        self.spawn_remaining = enemies_for_wave(self.wave);
        self.spawn_timer = 0.0;
    }

    /// Advance timers by `dt`. Pure bookkeeping: the caller performs spawns.
    pub fn advance(&mut self, dt: f32) -> WaveStep {
        let mut step = WaveStep::default();

        self.wave_timer += dt;
        if self.wave_timer >= WAVE_INTERVAL {
            self.wave_timer = 0.0;
            self.wave += 1;
            self.begin();
            step.wave_started = true;
        }

        if self.spawn_remaining > 0 {
            self.spawn_timer += dt;
            if self.spawn_timer >= WAVE_SPAWN_INTERVAL {
                self.spawn_timer = 0.0;
                self.spawn_remaining -= 1;
                step.spawns = 1;
            }
        }

        step
    }
}

/// Weighted power-up roll: four common kinds at weight 1 and a rare nuke
pub fn pick_powerup_kind<R: Rng>(rng: &mut R) -> PowerupKind {
    let total: f32 = PowerupKind::ALL.iter().map(|k| k.weight()).sum();
    let mut roll = rng.random::<f32>() * total;
    for kind in PowerupKind::ALL {
        roll -= kind.weight();
        if roll <= 0.0 {
            return kind;
        }
    }
    // Float rounding can leave a sliver of roll behind
    PowerupKind::Adrenaline
}

/// Start the current wave: reset its quota and maybe drop a power-up
pub fn start_wave(state: &mut GameState) {
    state.waves.begin();
    announce_wave(state);
}

/// Notify listeners of a fresh wave and roll its power-up drop
fn announce_wave(state: &mut GameState) {
    log::info!(
        "Wave {} begins ({} enemies)",
        state.waves.wave,
        state.waves.spawn_remaining
    );
    state.emit(GameEvent::WaveStarted {
        wave: state.waves.wave,
    });

    if state.rng.random_bool(POWERUP_WAVE_CHANCE) {
        let kind = pick_powerup_kind(&mut state.rng);
        let pos = random_arena_point(&mut state.rng);
        state.spawn_powerup(kind, pos);
    }
}

/// Per-tick scheduler update
pub fn update_spawning(state: &mut GameState, dt: f32) {
    let step = state.waves.advance(dt);

    if step.wave_started {
        announce_wave(state);
    }

    for _ in 0..step.spawns {
        state.spawn_enemy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::SPAWN_POINT;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_quota_formula() {
        assert_eq!(enemies_for_wave(1), 3);
        assert_eq!(enemies_for_wave(2), 5);
        assert_eq!(enemies_for_wave(10), 21);
    }

    #[test]
    fn test_waves_advance_per_interval() {
        let mut waves = WaveState::default();
        waves.begin();
        let n = 4;
        // Half an interval of slack keeps float accumulation off the boundary
        let ticks = ((n as f32 + 0.5) * WAVE_INTERVAL / DT) as usize;
        for _ in 0..ticks {
            waves.advance(DT);
        }
        assert_eq!(waves.wave, 1 + n);
    }

    #[test]
    fn test_each_wave_spawns_its_quota() {
        let mut waves = WaveState::default();
        waves.begin();
        let mut per_wave = vec![0u32; 1];
        let ticks = (5.5 * WAVE_INTERVAL / DT) as usize;
        for _ in 0..ticks {
            let step = waves.advance(DT);
            if step.wave_started {
                per_wave.push(0);
            }
            *per_wave.last_mut().unwrap() += step.spawns;
        }
        // Waves 1-5 ran to completion
        for (k, &count) in per_wave.iter().enumerate().take(5) {
            let wave = k as u32 + 1;
            assert_eq!(count, enemies_for_wave(wave), "wave {wave}");
        }
    }

    #[test]
    fn test_spawn_remaining_only_decreases_within_wave() {
        let mut waves = WaveState::default();
        waves.begin();
        let mut last = waves.spawn_remaining;
        for _ in 0..((WAVE_INTERVAL / DT) as usize - 2) {
            waves.advance(DT);
            assert!(waves.spawn_remaining <= last);
            last = waves.spawn_remaining;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn test_nuke_frequency_matches_weight() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let n = 200_000;
        let nukes = (0..n)
            .filter(|_| pick_powerup_kind(&mut rng) == PowerupKind::Nuke)
            .count();
        let expected = POWERUP_NUKE_WEIGHT / (4.0 + POWERUP_NUKE_WEIGHT);
        let observed = nukes as f32 / n as f32;
        assert!(
            (observed - expected).abs() < 0.004,
            "observed {observed}, expected {expected}"
        );
    }

    #[test]
    fn test_common_kinds_share_evenly() {
        let mut rng = Pcg32::seed_from_u64(5);
        let n = 100_000;
        let medkits = (0..n)
            .filter(|_| pick_powerup_kind(&mut rng) == PowerupKind::Medkit)
            .count();
        let observed = medkits as f32 / n as f32;
        assert!((observed - 1.0 / 4.2).abs() < 0.01);
    }

    #[test]
    fn test_update_spawning_creates_enemies_at_spawn_point() {
        let mut state = GameState::new(11);
        for _ in 0..60 {
            update_spawning(&mut state, DT);
        }
        // One second in: three spawns at 0.3s cadence
        assert_eq!(state.enemies.len(), 3);
        assert!(state.enemies.iter().all(|e| e.pos == SPAWN_POINT));
    }

    #[test]
    fn test_wave_start_announced_once() {
        let mut state = GameState::new(12);
        state.drain_events();
        let ticks = (1.5 * WAVE_INTERVAL / DT) as usize;
        for _ in 0..ticks {
            update_spawning(&mut state, DT);
        }
        let started: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::WaveStarted { .. }))
            .collect();
        assert_eq!(started, vec![GameEvent::WaveStarted { wave: 2 }]);
    }
}
