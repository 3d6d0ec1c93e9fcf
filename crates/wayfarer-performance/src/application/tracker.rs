//! Performance tracker.
//!
//! Each operation takes the current metrics and returns the next metrics.
//! Smoothed axes use an exponential moving average; the combat win-rate is
//! recomputed from a sliding window so that recent form shows immediately.

use tracing::debug;
use wayfarer_core::bounds::{blend, clamp_score, push_capped};
use wayfarer_world_state::domain::context::CombatResult;

use crate::domain::metrics::{CombatReport, PerformanceMetrics, ResourceAction, TrackerSettings};

/// Records a finished combat.
#[must_use]
pub fn record_combat_outcome(
    metrics: &PerformanceMetrics,
    report: &CombatReport,
    settings: &TrackerSettings,
) -> PerformanceMetrics {
    let alpha = settings.learning_rate;
    let window = settings.combat_window.max(1);
    let recent_combats = push_capped(&metrics.recent_combats, report.result, window);

    let (frustration_target, engagement_target) = match report.result {
        CombatResult::Victory => (0.0, 80.0),
        CombatResult::Defeat => (100.0, 70.0),
        CombatResult::Retreat => (60.0, 40.0),
    };

    let mut next = PerformanceMetrics {
        combat_win_rate: win_rate(&recent_combats),
        frustration: blend(metrics.frustration, frustration_target, alpha),
        engagement: blend(metrics.engagement, engagement_target, alpha),
        average_damage_taken: blend(metrics.average_damage_taken, report.damage_taken, alpha),
        combats_recorded: metrics.combats_recorded.saturating_add(1),
        defeats: metrics
            .defeats
            .saturating_add(u32::from(report.result == CombatResult::Defeat)),
        recent_combats,
        ..metrics.clone()
    };
    next.overall = clamp_score(next.composite_score());

    debug!(
        result = ?report.result,
        win_rate = next.combat_win_rate,
        frustration = next.frustration,
        "combat outcome recorded"
    );
    next
}

/// Records a resource spend, gather or craft.
#[must_use]
pub fn record_resource_action(
    metrics: &PerformanceMetrics,
    action: &ResourceAction,
    settings: &TrackerSettings,
) -> PerformanceMetrics {
    let alpha = settings.learning_rate;
    let mut next = PerformanceMetrics {
        resource_efficiency: blend(metrics.resource_efficiency, action.efficiency, alpha),
        ..metrics.clone()
    };
    if action.wasted {
        next.wasteful_actions = next.wasteful_actions.saturating_add(1);
        next.engagement = blend(next.engagement, 30.0, alpha);
    }
    next.overall = clamp_score(next.composite_score());
    next
}

/// Records a quest that was completed (`success`) or failed.
#[must_use]
pub fn record_quest_outcome(
    metrics: &PerformanceMetrics,
    success: bool,
    settings: &TrackerSettings,
) -> PerformanceMetrics {
    let alpha = settings.learning_rate;
    let mut next = if success {
        PerformanceMetrics {
            quest_completion: blend(metrics.quest_completion, 100.0, alpha),
            frustration: blend(metrics.frustration, 0.0, alpha),
            engagement: blend(metrics.engagement, 85.0, alpha),
            quests_completed: metrics.quests_completed.saturating_add(1),
            ..metrics.clone()
        }
    } else {
        PerformanceMetrics {
            quest_completion: blend(metrics.quest_completion, 0.0, alpha),
            frustration: blend(metrics.frustration, 100.0, alpha),
            quests_failed: metrics.quests_failed.saturating_add(1),
            ..metrics.clone()
        }
    };
    next.overall = clamp_score(next.composite_score());
    next
}

/// Counts one processed turn.
#[must_use]
pub fn observe_turn(metrics: &PerformanceMetrics) -> PerformanceMetrics {
    PerformanceMetrics {
        turns_observed: metrics.turns_observed.saturating_add(1),
        ..metrics.clone()
    }
}

/// Fresh metrics, as for a new player.
#[must_use]
pub fn reset() -> PerformanceMetrics {
    PerformanceMetrics::default()
}

#[allow(clippy::cast_precision_loss)]
fn win_rate(recent: &[CombatResult]) -> f64 {
    if recent.is_empty() {
        return 50.0;
    }
    let victories = recent
        .iter()
        .filter(|r| **r == CombatResult::Victory)
        .count();
    clamp_score(victories as f64 / recent.len() as f64 * 100.0)
}
