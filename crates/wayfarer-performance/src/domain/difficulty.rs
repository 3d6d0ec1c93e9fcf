//! Difficulty profile, presets and adjustment settings.

use serde::{Deserialize, Serialize};

/// Smallest multiplier any axis may take.
pub const MULTIPLIER_MIN: f64 = 0.3;
/// Largest multiplier any axis may take.
pub const MULTIPLIER_MAX: f64 = 2.0;

/// Per-axis scaling multipliers consumed by the encounter builder and the
/// narrative generator. Every axis lies in `[0.3, 2.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyProfile {
    /// Enemy stat scaling.
    pub combat_scaling: f64,
    /// How scarce resources are.
    pub resource_scarcity: f64,
    /// How hard consequences land.
    pub consequence_severity: f64,
    /// How tight deadlines are.
    pub time_constraints: f64,
    /// How cleverly enemies act.
    pub enemy_intelligence: f64,
    /// How rare loot is; lower means better drops.
    pub loot_rarity: f64,
    /// Experience multiplier.
    pub experience_gain: f64,
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Coarse difficulty label for narrative use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    /// Mean pressure below 0.8.
    Gentle,
    /// Mean pressure below 1.15.
    Balanced,
    /// Mean pressure below 1.5.
    Demanding,
    /// Anything harsher.
    Brutal,
}

impl DifficultyProfile {
    /// A profile with every axis at `value` (clamped).
    #[must_use]
    pub fn uniform(value: f64) -> Self {
        Self {
            combat_scaling: value,
            resource_scarcity: value,
            consequence_severity: value,
            time_constraints: value,
            enemy_intelligence: value,
            loot_rarity: value,
            experience_gain: value,
        }
        .clamped()
    }

    /// Returns the profile with every axis clamped to `[0.3, 2.0]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |v: f64| {
            if v.is_nan() {
                1.0
            } else {
                v.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX)
            }
        };
        Self {
            combat_scaling: clamp(self.combat_scaling),
            resource_scarcity: clamp(self.resource_scarcity),
            consequence_severity: clamp(self.consequence_severity),
            time_constraints: clamp(self.time_constraints),
            enemy_intelligence: clamp(self.enemy_intelligence),
            loot_rarity: clamp(self.loot_rarity),
            experience_gain: clamp(self.experience_gain),
        }
    }

    /// All axes in declaration order.
    #[must_use]
    pub fn axes(&self) -> [f64; 7] {
        [
            self.combat_scaling,
            self.resource_scarcity,
            self.consequence_severity,
            self.time_constraints,
            self.enemy_intelligence,
            self.loot_rarity,
            self.experience_gain,
        ]
    }

    /// Coarse tier from the mean of the pressure axes (loot and experience
    /// excluded).
    #[must_use]
    pub fn describe(&self) -> DifficultyTier {
        let pressure = (self.combat_scaling
            + self.resource_scarcity
            + self.consequence_severity
            + self.time_constraints
            + self.enemy_intelligence)
            / 5.0;
        if pressure < 0.8 {
            DifficultyTier::Gentle
        } else if pressure < 1.15 {
            DifficultyTier::Balanced
        } else if pressure < 1.5 {
            DifficultyTier::Demanding
        } else {
            DifficultyTier::Brutal
        }
    }
}

/// Named starting point for the difficulty profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyPreset {
    /// Forgiving.
    Easy,
    /// Baseline.
    #[default]
    Normal,
    /// Punishing.
    Hard,
    /// Use `DifficultySettings::custom`.
    Custom,
}

impl DifficultyPreset {
    /// The profile a preset starts from. `Custom` falls back to normal when
    /// no custom profile is supplied.
    #[must_use]
    pub fn base_profile(self, custom: Option<DifficultyProfile>) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                combat_scaling: 0.75,
                resource_scarcity: 0.7,
                consequence_severity: 0.7,
                time_constraints: 0.7,
                enemy_intelligence: 0.7,
                loot_rarity: 0.8,
                experience_gain: 1.25,
            },
            Self::Normal => DifficultyProfile::default(),
            Self::Hard => DifficultyProfile {
                combat_scaling: 1.35,
                resource_scarcity: 1.3,
                consequence_severity: 1.3,
                time_constraints: 1.25,
                enemy_intelligence: 1.4,
                loot_rarity: 1.2,
                experience_gain: 0.9,
            },
            Self::Custom => custom.unwrap_or_default(),
        }
    }
}

/// Weight of each performance sub-score in the adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceWeights {
    /// Combat win-rate.
    pub combat: f64,
    /// Resource efficiency.
    pub resource: f64,
    /// Quest completion.
    pub quest: f64,
    /// Inverse frustration.
    pub frustration: f64,
    /// Engagement.
    pub engagement: f64,
}

impl Default for PerformanceWeights {
    fn default() -> Self {
        Self {
            combat: 0.3,
            resource: 0.2,
            quest: 0.2,
            frustration: 0.15,
            engagement: 0.15,
        }
    }
}

/// How strongly each axis follows the performance delta. Negative values
/// move an axis against the delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSensitivity {
    /// Combat scaling.
    pub combat_scaling: f64,
    /// Resource scarcity.
    pub resource_scarcity: f64,
    /// Consequence severity.
    pub consequence_severity: f64,
    /// Time constraints.
    pub time_constraints: f64,
    /// Enemy intelligence.
    pub enemy_intelligence: f64,
    /// Loot rarity.
    pub loot_rarity: f64,
    /// Experience gain.
    pub experience_gain: f64,
}

impl Default for AxisSensitivity {
    fn default() -> Self {
        Self {
            combat_scaling: 1.0,
            resource_scarcity: 0.6,
            consequence_severity: 0.5,
            time_constraints: 0.4,
            enemy_intelligence: 0.8,
            loot_rarity: -0.2,
            experience_gain: -0.3,
        }
    }
}

/// Player-facing difficulty configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultySettings {
    /// Starting preset.
    pub preset: DifficultyPreset,
    /// Profile used by the `custom` preset.
    pub custom: Option<DifficultyProfile>,
    /// Whether performance feeds back into the profile.
    pub dynamic_adjustment: bool,
    /// Scale applied to the normalised performance delta.
    pub sensitivity: f64,
    /// Largest absolute delta allowed.
    pub max_adjustment_per_session: f64,
    /// Sub-score weights.
    pub weights: PerformanceWeights,
    /// Per-axis response.
    pub axis_sensitivity: AxisSensitivity,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            preset: DifficultyPreset::Normal,
            custom: None,
            dynamic_adjustment: true,
            sensitivity: 0.5,
            max_adjustment_per_session: 0.3,
            weights: PerformanceWeights::default(),
            axis_sensitivity: AxisSensitivity::default(),
        }
    }
}
