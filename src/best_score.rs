//! Best-ever run record
//!
//! Persisted to LocalStorage. A run beats the record by reaching a later
//! wave, or the same wave with a longer survival time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DataError;
use crate::platform::storage;

/// Best wave reached and survival time (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BestScore {
    pub wave: u32,
    pub time: f32,
}

impl BestScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "zombie_arena_best";

    /// True if (`wave`, `time`) strictly beats this record
    pub fn is_beaten_by(&self, wave: u32, time: f32) -> bool {
        wave > self.wave || (wave == self.wave && time > self.time)
    }

    /// Replace the record if strictly improved. Returns whether it changed.
    pub fn record(&mut self, wave: u32, time: f32) -> bool {
        if !self.is_beaten_by(wave, time) {
            return false;
        }
        self.wave = wave;
        self.time = time;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.wave == 0 && self.time == 0.0
    }

    /// Decode a stored record. Both fields must be finite numbers; negative
    /// values clamp to zero.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let value: Value = serde_json::from_str(json)?;
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite())
        };
        match (field("wave"), field("time")) {
            (Some(wave), Some(time)) => Ok(Self {
                wave: wave.max(0.0) as u32,
                time: time.max(0.0) as f32,
            }),
            _ => Err(DataError::InvalidBestScore),
        }
    }

    /// Load the record, falling back to an empty one
    pub fn load() -> Self {
        let Some(json) = storage::get(Self::STORAGE_KEY) else {
            log::info!("No best score found, starting fresh");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(best) => {
                log::info!("Loaded best score: wave {} ({:.0}s)", best.wave, best.time);
                best
            }
            Err(e) => {
                log::warn!("Ignoring stored best score: {}", e);
                Self::default()
            }
        }
    }

    /// Save the record
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            storage::set(Self::STORAGE_KEY, &json);
            log::info!("Best score saved (wave {})", self.wave);
        }
    }
}
