//! Engine settings.
//!
//! Every section defaults on its own, so a settings file only needs the
//! values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use wayfarer_core::error::DomainError;
use wayfarer_economy::domain::reward::RewardScaling;
use wayfarer_economy::domain::scarcity::ScarcitySettings;
use wayfarer_performance::domain::difficulty::DifficultySettings;
use wayfarer_performance::domain::metrics::TrackerSettings;
use wayfarer_recovery::domain::catalog::default_mechanics;
use wayfarer_recovery::domain::mechanic::RecoveryMechanic;

/// Recovery tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Remedy catalogue offered after failures.
    pub mechanics: Vec<RecoveryMechanic>,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            mechanics: default_mechanics(),
        }
    }
}

/// All engine tunables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Difficulty preset and adjustment.
    pub difficulty: DifficultySettings,
    /// Performance tracker tuning.
    pub tracker: TrackerSettings,
    /// Global scarcity tuning.
    pub scarcity: ScarcitySettings,
    /// Reward scaling.
    pub rewards: RewardScaling,
    /// Recovery catalogue.
    pub recovery: RecoverySettings,
}

impl EngineSettings {
    /// Parses settings from YAML.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DomainError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| DomainError::Configuration(format!("invalid engine settings: {e}")))
    }

    /// Reads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let settings = Self::from_yaml_str(&yaml)?;
        info!(path = %path.display(), preset = ?settings.difficulty.preset, "engine settings loaded");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_performance::domain::difficulty::DifficultyPreset;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        assert_eq!(EngineSettings::from_yaml_str("").unwrap(), EngineSettings::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = "
difficulty:
  preset: hard
  dynamic_adjustment: false
tracker:
  learning_rate: 0.2
rewards:
  bonus_item_chance: 0.0
";
        let settings = EngineSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.difficulty.preset, DifficultyPreset::Hard);
        assert!(!settings.difficulty.dynamic_adjustment);
        assert!((settings.tracker.learning_rate - 0.2).abs() < f64::EPSILON);
        assert_eq!(settings.tracker.combat_window, 10);
        assert!(settings.rewards.bonus_item_chance.abs() < f64::EPSILON);
        assert!((settings.rewards.risk_bonus_multiplier - 0.2).abs() < f64::EPSILON);
        assert_eq!(settings.recovery.mechanics.len(), default_mechanics().len());
    }

    #[test]
    fn test_malformed_yaml_is_a_configuration_error() {
        let result = EngineSettings::from_yaml_str("difficulty: [unclosed");
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_missing_file_is_a_configuration_error() {
        let result = EngineSettings::load("/nonexistent/wayfarer/settings.yaml");
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}
