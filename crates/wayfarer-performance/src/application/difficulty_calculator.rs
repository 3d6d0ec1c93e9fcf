//! Difficulty calculator.
//!
//! `compute_difficulty` is pure: the same settings and metrics always give
//! the same profile.

use crate::domain::difficulty::{DifficultyProfile, DifficultySettings};
use crate::domain::metrics::PerformanceMetrics;

/// Computes the difficulty profile for the next encounter.
#[must_use]
pub fn compute_difficulty(
    settings: &DifficultySettings,
    metrics: &PerformanceMetrics,
) -> DifficultyProfile {
    let base = settings.preset.base_profile(settings.custom);
    if !settings.dynamic_adjustment {
        return base.clamped();
    }

    let delta = performance_delta(settings, metrics);
    let axis = &settings.axis_sensitivity;
    let scale = |value: f64, sensitivity: f64| value * (1.0 + delta * sensitivity);

    DifficultyProfile {
        combat_scaling: scale(base.combat_scaling, axis.combat_scaling),
        resource_scarcity: scale(base.resource_scarcity, axis.resource_scarcity),
        consequence_severity: scale(base.consequence_severity, axis.consequence_severity),
        time_constraints: scale(base.time_constraints, axis.time_constraints),
        enemy_intelligence: scale(base.enemy_intelligence, axis.enemy_intelligence),
        loot_rarity: scale(base.loot_rarity, axis.loot_rarity),
        experience_gain: scale(base.experience_gain, axis.experience_gain),
    }
    .clamped()
}

/// Weighted performance score in `[0, 100]`.
#[must_use]
pub fn weighted_performance(settings: &DifficultySettings, metrics: &PerformanceMetrics) -> f64 {
    let w = &settings.weights;
    let parts = [
        (w.combat, metrics.combat_win_rate),
        (w.resource, metrics.resource_efficiency),
        (w.quest, metrics.quest_completion),
        (w.frustration, 100.0 - metrics.frustration),
        (w.engagement, metrics.engagement),
    ];
    let total_weight: f64 = parts.iter().map(|(weight, _)| weight.max(0.0)).sum();
    if total_weight <= f64::EPSILON {
        return 50.0;
    }
    let weighted: f64 = parts
        .iter()
        .map(|(weight, score)| weight.max(0.0) * score.clamp(0.0, 100.0))
        .sum();
    weighted / total_weight
}

/// Signed adjustment: positive when the player is doing well, capped by
/// the per-session maximum.
#[must_use]
pub fn performance_delta(settings: &DifficultySettings, metrics: &PerformanceMetrics) -> f64 {
    let score = weighted_performance(settings, metrics);
    let cap = settings.max_adjustment_per_session.abs();
    ((score - 50.0) / 50.0 * settings.sensitivity).clamp(-cap, cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::difficulty::{
        AxisSensitivity, DifficultyPreset, MULTIPLIER_MAX, MULTIPLIER_MIN,
    };

    fn metrics_at(score: f64) -> PerformanceMetrics {
        PerformanceMetrics {
            combat_win_rate: score,
            resource_efficiency: score,
            quest_completion: score,
            frustration: 100.0 - score,
            engagement: score,
            ..PerformanceMetrics::default()
        }
    }

    #[test]
    fn test_neutral_performance_keeps_preset() {
        let settings = DifficultySettings::default();
        let profile = compute_difficulty(&settings, &metrics_at(50.0));
        assert_eq!(profile, DifficultyProfile::default());
    }

    #[test]
    fn test_strong_player_gets_harder_combat_and_better_loot() {
        let settings = DifficultySettings::default();
        let profile = compute_difficulty(&settings, &metrics_at(100.0));

        // delta = 1.0 * 0.5 = 0.5, capped at 0.3
        assert!((profile.combat_scaling - 1.3).abs() < 1e-9);
        assert!((profile.enemy_intelligence - 1.24).abs() < 1e-9);
        assert!(profile.loot_rarity < 1.0);
        assert!(profile.experience_gain < 1.0);
    }

    #[test]
    fn test_struggling_player_gets_relief() {
        let settings = DifficultySettings::default();
        let profile = compute_difficulty(&settings, &metrics_at(0.0));
        assert!((profile.combat_scaling - 0.7).abs() < 1e-9);
        assert!(profile.experience_gain > 1.0);
    }

    #[test]
    fn test_static_settings_ignore_metrics() {
        let settings = DifficultySettings {
            preset: DifficultyPreset::Hard,
            dynamic_adjustment: false,
            ..DifficultySettings::default()
        };
        let profile = compute_difficulty(&settings, &metrics_at(0.0));
        assert!((profile.combat_scaling - 1.35).abs() < 1e-9);
    }

    #[test]
    fn test_every_axis_bounded_for_extreme_inputs() {
        let extreme_settings = DifficultySettings {
            preset: DifficultyPreset::Custom,
            custom: Some(DifficultyProfile {
                combat_scaling: 50.0,
                resource_scarcity: -3.0,
                ..DifficultyProfile::uniform(2.0)
            }),
            sensitivity: 40.0,
            max_adjustment_per_session: 25.0,
            axis_sensitivity: AxisSensitivity {
                combat_scaling: 9.0,
                loot_rarity: -9.0,
                ..AxisSensitivity::default()
            },
            ..DifficultySettings::default()
        };

        for settings in [DifficultySettings::default(), extreme_settings] {
            for score in [0.0, 100.0, -500.0, 500.0] {
                let profile = compute_difficulty(&settings, &metrics_at(score));
                for axis in profile.axes() {
                    assert!(
                        (MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&axis),
                        "axis {axis} out of range for score {score}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_compute_is_pure() {
        let settings = DifficultySettings::default();
        let metrics = metrics_at(73.0);
        assert_eq!(
            compute_difficulty(&settings, &metrics),
            compute_difficulty(&settings, &metrics)
        );
    }

    #[test]
    fn test_zero_weights_fall_back_to_neutral_score() {
        let settings = DifficultySettings {
            weights: crate::domain::difficulty::PerformanceWeights {
                combat: 0.0,
                resource: 0.0,
                quest: 0.0,
                frustration: 0.0,
                engagement: 0.0,
            },
            ..DifficultySettings::default()
        };
        assert!((weighted_performance(&settings, &metrics_at(90.0)) - 50.0).abs() < 1e-9);
    }
}
