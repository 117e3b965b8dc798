//! Game settings and preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// Default location of the revive question pool
pub const DEFAULT_QUESTIONS_URL: &str = "data/questions_isat.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Data ===
    /// Where revive attempts are reported (none disables telemetry)
    pub telemetry_endpoint: Option<String>,
    /// Question pool to load at startup
    pub questions_url: String,

    // === Behavior ===
    /// Pause when the window loses focus
    pub pause_on_blur: bool,

    // === Visual Effects ===
    /// Camera shake during the nuke
    pub screen_shake: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            telemetry_endpoint: None,
            questions_url: DEFAULT_QUESTIONS_URL.to_string(),
            pause_on_blur: true,
            screen_shake: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "zombie_arena_settings";

    /// Native override for the telemetry endpoint
    pub const TELEMETRY_ENV: &'static str = "ZOMBIE_ARENA_TELEMETRY";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Endpoint to report to, ignoring blank values
    pub fn telemetry_endpoint(&self) -> Option<&str> {
        self.telemetry_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Decode stored settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Load settings from LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        if let Some(settings) = storage::get(Self::STORAGE_KEY)
            .as_deref()
            .and_then(Self::from_json)
        {
            log::info!("Loaded settings from LocalStorage");
            return settings;
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native builds use defaults plus the environment override
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = Self::default();
        if let Ok(endpoint) = std::env::var(Self::TELEMETRY_ENV) {
            log::info!("Telemetry endpoint from {}", Self::TELEMETRY_ENV);
            settings.telemetry_endpoint = Some(endpoint);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.telemetry_endpoint(), None);
        assert_eq!(settings.questions_url, DEFAULT_QUESTIONS_URL);
        assert!(settings.pause_on_blur);
        assert!(settings.effective_screen_shake());
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            Settings::from_json(r#"{"telemetry_endpoint": "https://example.test/log"}"#).unwrap();
        assert_eq!(settings.telemetry_endpoint(), Some("https://example.test/log"));
        assert!(settings.pause_on_blur);
        assert!(Settings::from_json("not json").is_none());
    }

    #[test]
    fn test_blank_endpoint_is_none() {
        let settings = Settings {
            telemetry_endpoint: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.telemetry_endpoint(), None);
    }
}
