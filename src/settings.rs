//! # Settings Module
//!
//! ## Purpose
//! Persistent user settings of the simulator: time stepping, equilibrium tolerance,
//! logging and an optional user reaction catalog.
//!
//! ## Time step
//! The interactive loop advances the engine by
//! ```text
//! dt = base_dt * speed * time_scale
//! ```
//! where `base_dt` is one display frame (0.016 s), `speed` a continuous multiplier and
//! `time_scale` one of [`TIME_SCALES`], selected by index. Slow reactions (Haber-Bosch
//! without catalyst) are only watchable at the larger scales.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "base_dt": 0.016,
//!   "speed": 1.0,
//!   "time_scale_index": 0,
//!   "equilibrium_tolerance": 0.05,
//!   "steps_per_run": 100,
//!   "log_level": "info",
//!   "log_file": null,
//!   "user_catalog": null
//! }
//! ```
//! Stored in `simulation_settings.json` in the working directory. A missing or broken
//! file means defaults.
use crate::Kinetics::equilibrium_engine::EQUILIBRIUM_TOLERANCE;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const SETTINGS_FILE: &str = "simulation_settings.json";
/// one display frame, s
pub const BASE_DT: f64 = 0.016;
/// selectable time multipliers
pub const TIME_SCALES: [f64; 5] = [1.0, 10.0, 100.0, 1000.0, 10000.0];
pub const MIN_SPEED: f64 = 0.1;
pub const MAX_SPEED: f64 = 5.0;
/// largest frame time accepted from a settings file, s
pub const MAX_BASE_DT: f64 = 1.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value {value} for '{name}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub base_dt: f64,
    pub speed: f64,
    pub time_scale_index: usize,
    pub equilibrium_tolerance: f64,
    pub steps_per_run: usize,
    pub log_level: String,
    pub log_file: Option<String>,
    /// JSON file with extra reactions shown next to the built-in ones
    pub user_catalog: Option<String>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            base_dt: BASE_DT,
            speed: 1.0,
            time_scale_index: 0,
            equilibrium_tolerance: EQUILIBRIUM_TOLERANCE,
            steps_per_run: 100,
            log_level: "info".to_string(),
            log_file: None,
            user_catalog: None,
        }
    }
}

impl SimulationSettings {
    pub fn time_scale(&self) -> f64 {
        TIME_SCALES[self.time_scale_index.min(TIME_SCALES.len() - 1)]
    }

    /// base_dt * speed * time_scale
    pub fn effective_dt(&self) -> f64 {
        self.base_dt * self.speed * self.time_scale()
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), SettingsError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(SettingsError::InvalidValue {
                name: "speed",
                value: speed.to_string(),
            });
        }
        self.speed = speed;
        Ok(())
    }

    pub fn set_time_scale_index(&mut self, index: usize) -> Result<(), SettingsError> {
        if index >= TIME_SCALES.len() {
            return Err(SettingsError::InvalidValue {
                name: "time_scale_index",
                value: index.to_string(),
            });
        }
        self.time_scale_index = index;
        Ok(())
    }

    pub fn set_steps_per_run(&mut self, steps: usize) -> Result<(), SettingsError> {
        if steps == 0 {
            return Err(SettingsError::InvalidValue {
                name: "steps_per_run",
                value: steps.to_string(),
            });
        }
        self.steps_per_run = steps;
        Ok(())
    }

    /// all numeric fields in range; used after loading a hand-edited file
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |name: &'static str, x: f64| {
            if x.is_finite() && x > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::InvalidValue {
                    name,
                    value: x.to_string(),
                })
            }
        };
        positive("base_dt", self.base_dt)?;
        positive("equilibrium_tolerance", self.equilibrium_tolerance)?;
        if self.base_dt > MAX_BASE_DT {
            return Err(SettingsError::InvalidValue {
                name: "base_dt",
                value: self.base_dt.to_string(),
            });
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.speed) {
            return Err(SettingsError::InvalidValue {
                name: "speed",
                value: self.speed.to_string(),
            });
        }
        if self.equilibrium_tolerance >= 1.0 {
            return Err(SettingsError::InvalidValue {
                name: "equilibrium_tolerance",
                value: self.equilibrium_tolerance.to_string(),
            });
        }
        if self.time_scale_index >= TIME_SCALES.len() {
            return Err(SettingsError::InvalidValue {
                name: "time_scale_index",
                value: self.time_scale_index.to_string(),
            });
        }
        if self.steps_per_run == 0 {
            return Err(SettingsError::InvalidValue {
                name: "steps_per_run",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Loads, holds and saves [`SimulationSettings`].
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings: SimulationSettings,
    config_file: String,
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsManager {
    /// settings from `simulation_settings.json`, defaults if it is absent or invalid
    pub fn new() -> Self {
        Self::with_config_file(SETTINGS_FILE)
    }

    pub fn with_config_file(config_file: &str) -> Self {
        let settings = match Self::load_config(config_file) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("cannot use settings from '{}': {}; using defaults", config_file, e);
                SimulationSettings::default()
            }
        };
        Self {
            settings,
            config_file: config_file.to_string(),
        }
    }

    fn load_config(config_file: &str) -> Result<SimulationSettings, SettingsError> {
        if Path::new(config_file).exists() {
            let content = fs::read_to_string(config_file)?;
            let settings: SimulationSettings = serde_json::from_str(&content)?;
            settings.validate()?;
            info!("settings loaded from '{}'", config_file);
            Ok(settings)
        } else {
            Ok(SimulationSettings::default())
        }
    }

    /// Writes the settings file. Does nothing in tests.
    pub fn save_config(&self) -> Result<(), SettingsError> {
        #[cfg(test)]
        {
            return Ok(());
        }

        #[cfg(not(test))]
        {
            let content = serde_json::to_string_pretty(&self.settings)?;
            fs::write(&self.config_file, content)?;
            Ok(())
        }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// applies `change` and saves; the old settings stay if the change fails
    pub fn update<F>(&mut self, change: F) -> Result<(), SettingsError>
    where
        F: FnOnce(&mut SimulationSettings) -> Result<(), SettingsError>,
    {
        let mut updated = self.settings.clone();
        change(&mut updated)?;
        updated.validate()?;
        self.settings = updated;
        self.save_config()
    }

    pub fn reset_to_defaults(&mut self) -> Result<(), SettingsError> {
        self.settings = SimulationSettings::default();
        self.save_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_effective_dt() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.time_scale(), 1.0);
        assert_relative_eq!(settings.effective_dt(), 0.016);
    }

    #[test]
    fn test_effective_dt_with_speed_and_scale() {
        let mut settings = SimulationSettings::default();
        settings.set_speed(2.5).unwrap();
        settings.set_time_scale_index(3).unwrap();
        assert_relative_eq!(settings.effective_dt(), 0.016 * 2.5 * 1000.0, max_relative = 1e-12);
        assert!(settings.set_time_scale_index(5).is_err());
        assert!(settings.set_speed(0.0).is_err());
        assert!(settings.set_speed(f64::NAN).is_err());
        assert!(settings.set_steps_per_run(0).is_err());
        // failed setters leave the previous value
        assert_eq!(settings.time_scale_index, 3);
        assert_eq!(settings.speed, 2.5);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let manager = SettingsManager::with_config_file("/no/such/simulation_settings.json");
        assert_eq!(*manager.settings(), SimulationSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"speed": 3.0, "time_scale_index": 2, "log_level": "debug"}"#)
            .unwrap();
        let manager = SettingsManager::with_config_file(file.path().to_str().unwrap());
        let settings = manager.settings();
        assert_eq!(settings.speed, 3.0);
        assert_eq!(settings.time_scale(), 100.0);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.base_dt, BASE_DT);
        assert_eq!(settings.steps_per_run, 100);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"time_scale_index": 9}"#).unwrap();
        let manager = SettingsManager::with_config_file(file.path().to_str().unwrap());
        assert_eq!(*manager.settings(), SimulationSettings::default());

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        let manager = SettingsManager::with_config_file(file.path().to_str().unwrap());
        assert_eq!(*manager.settings(), SimulationSettings::default());
    }

    #[test]
    fn test_out_of_range_file_values_give_defaults() {
        for content in [
            r#"{"speed": 1000.0}"#,
            r#"{"speed": 0.01}"#,
            r#"{"base_dt": 50.0}"#,
            r#"{"equilibrium_tolerance": 2.0}"#,
        ] {
            let mut file = NamedTempFile::new().unwrap();
            file.write_all(content.as_bytes()).unwrap();
            let manager = SettingsManager::with_config_file(file.path().to_str().unwrap());
            assert_eq!(*manager.settings(), SimulationSettings::default(), "{}", content);
        }
        let mut edited = SimulationSettings::default();
        edited.speed = MAX_SPEED * 2.0;
        assert!(matches!(
            edited.validate(),
            Err(SettingsError::InvalidValue { name: "speed", .. })
        ));
        edited.speed = MAX_SPEED;
        assert!(edited.validate().is_ok());
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut manager = SettingsManager::with_config_file("/no/such/file.json");
        manager
            .update(|s| {
                s.set_speed(2.0)?;
                s.set_time_scale_index(1)
            })
            .unwrap();
        assert_relative_eq!(manager.settings().effective_dt(), 0.016 * 2.0 * 10.0, max_relative = 1e-12);

        let result = manager.update(|s| {
            s.set_speed(4.0)?;
            s.set_time_scale_index(42)
        });
        assert!(matches!(result, Err(SettingsError::InvalidValue { name: "time_scale_index", .. })));
        assert_eq!(manager.settings().speed, 2.0);

        manager.reset_to_defaults().unwrap();
        assert_eq!(*manager.settings(), SimulationSettings::default());
    }
}
