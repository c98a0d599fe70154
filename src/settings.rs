//! Session timing and spawn tuning
//!
//! Loaded from JSON; every field falls back to its default when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Start sequence ===
    /// Seconds after start before the banner is cleared
    pub banner_delay_secs: f64,
    /// Seconds after the banner clears before spawning begins
    pub spawn_delay_secs: f64,

    // === Spawning ===
    /// Seconds between obstacle spawns
    pub spawn_interval_secs: f64,
    /// Obstacles spawn with lateral offset in [-lateral_range, lateral_range]
    pub lateral_range: f32,
    /// Spawn RNG seed (same seed, same offsets)
    pub seed: u64,

    // === Records ===
    /// Finished runs kept per session
    pub max_records: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            banner_delay_secs: BANNER_DELAY_SECS,
            spawn_delay_secs: SPAWN_DELAY_SECS,
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            lateral_range: LATERAL_RANGE,
            seed: 0,
            max_records: MAX_RECORDS,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the scheduler cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.banner_delay_secs.is_finite() || self.banner_delay_secs < 0.0 {
            return Err(SettingsError::Invalid {
                field: "banner_delay_secs",
                reason: "must be finite and non-negative",
            });
        }
        if !self.spawn_delay_secs.is_finite() || self.spawn_delay_secs < 0.0 {
            return Err(SettingsError::Invalid {
                field: "spawn_delay_secs",
                reason: "must be finite and non-negative",
            });
        }
        // A zero interval would reschedule forever within one advance
        if !self.spawn_interval_secs.is_finite() || self.spawn_interval_secs <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "spawn_interval_secs",
                reason: "must be finite and positive",
            });
        }
        if !self.lateral_range.is_finite() || self.lateral_range < 0.0 {
            return Err(SettingsError::Invalid {
                field: "lateral_range",
                reason: "must be finite and non-negative",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.spawn_interval_secs, 1.5);
        assert_eq!(settings.lateral_range, 2.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "lateral_range": 1.0 }"#).unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.lateral_range, 1.0);
        assert_eq!(settings.banner_delay_secs, 1.0);
        assert_eq!(settings.max_records, 10);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = Settings::from_json(r#"{ "spawn_interval_secs": 0.0 }"#).unwrap_err();
        assert_eq!(
            err,
            SettingsError::Invalid {
                field: "spawn_interval_secs",
                reason: "must be finite and positive",
            }
        );
    }

    #[test]
    fn test_rejects_negative_range() {
        let err = Settings::from_json(r#"{ "lateral_range": -1.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "lateral_range", .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ seed: "),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: 7,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/nonexistent/koro-stage/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
