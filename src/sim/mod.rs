//! Simulation core
//!
//! All gameplay logic lives here:
//! - Variable timestep driven by the frame delta
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod movement;
pub mod nuke;
pub mod resolve;
pub mod revive;
pub mod state;
pub mod tick;
pub mod waves;

pub use arena::{SPAWN_POINT, constrain_to_arena, random_arena_point};
pub use movement::MoveKeys;
pub use nuke::{NukePhase, NukeSequence, NukeStep};
pub use revive::ReviveState;
pub use state::{
    DeathCause, Effects, Enemy, GameEvent, GameMode, GameState, Player, Powerup, PowerupKind,
};
pub use tick::{Action, TickInput, apply_action, tick};
pub use waves::{WaveState, enemies_for_wave};
