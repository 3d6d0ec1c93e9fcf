//! Rolling performance metrics.

use serde::{Deserialize, Serialize};
use wayfarer_world_state::domain::context::CombatResult;

/// Tunables for the performance tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// EMA learning rate applied to smoothed axes.
    pub learning_rate: f64,
    /// Number of recent combats the win-rate is computed over.
    pub combat_window: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            combat_window: 10,
        }
    }
}

/// A finished combat encounter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    /// How the encounter ended.
    pub result: CombatResult,
    /// Share of maximum health lost, in `[0, 100]`.
    #[serde(default)]
    pub damage_taken: f64,
}

/// A resource spent, gathered or crafted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAction {
    /// Resource that was used.
    pub resource_id: String,
    /// How well it was used, in `[0, 100]`.
    pub efficiency: f64,
    /// Whether the generator judged the use wasteful.
    #[serde(default)]
    pub wasted: bool,
}

/// Rolling skill and engagement signal for one player.
///
/// Every score lives in `[0, 100]`; `recent_combats` never exceeds the
/// tracker's combat window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceMetrics {
    /// Victories as a share of the recent combat window.
    pub combat_win_rate: f64,
    /// Smoothed resource efficiency.
    pub resource_efficiency: f64,
    /// Smoothed quest completion.
    pub quest_completion: f64,
    /// Smoothed frustration; high means the player keeps losing.
    pub frustration: f64,
    /// Smoothed engagement.
    pub engagement: f64,
    /// Mean of the five axes, with frustration inverted.
    pub overall: f64,
    /// Smoothed share of health lost per combat.
    pub average_damage_taken: f64,
    /// Most recent combat results, oldest first.
    pub recent_combats: Vec<CombatResult>,
    /// Lifetime combat count.
    pub combats_recorded: u32,
    /// Lifetime defeats.
    pub defeats: u32,
    /// Lifetime completed quests.
    pub quests_completed: u32,
    /// Lifetime failed quests.
    pub quests_failed: u32,
    /// Lifetime wasteful resource actions.
    pub wasteful_actions: u32,
    /// Turns the tracker has seen.
    pub turns_observed: u32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        let mut metrics = Self {
            combat_win_rate: 50.0,
            resource_efficiency: 50.0,
            quest_completion: 50.0,
            frustration: 0.0,
            engagement: 50.0,
            overall: 0.0,
            average_damage_taken: 0.0,
            recent_combats: Vec::new(),
            combats_recorded: 0,
            defeats: 0,
            quests_completed: 0,
            quests_failed: 0,
            wasteful_actions: 0,
            turns_observed: 0,
        };
        metrics.overall = metrics.composite_score();
        metrics
    }
}

impl PerformanceMetrics {
    /// Unweighted mean of the five skill axes with frustration inverted.
    #[must_use]
    pub fn composite_score(&self) -> f64 {
        (self.combat_win_rate
            + self.resource_efficiency
            + self.quest_completion
            + (100.0 - self.frustration)
            + self.engagement)
            / 5.0
    }

    /// All bounded axes, for invariant checks.
    #[must_use]
    pub fn axes(&self) -> [f64; 7] {
        [
            self.combat_win_rate,
            self.resource_efficiency,
            self.quest_completion,
            self.frustration,
            self.engagement,
            self.overall,
            self.average_damage_taken,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_overall_matches_composite() {
        let metrics = PerformanceMetrics::default();
        assert!((metrics.overall - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: TrackerSettings = serde_json::from_str(r#"{"learning_rate":0.25}"#).unwrap();
        assert_eq!(settings.combat_window, 10);
        assert!((settings.learning_rate - 0.25).abs() < f64::EPSILON);
    }
}
