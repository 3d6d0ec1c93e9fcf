//! Failure & recovery system.
//!
//! FailureType -> RecoveryMechanic -> RecoveryRecord. Records are never
//! edited once written; the caller appends them to its history.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use wayfarer_core::bounds::clamp_score;
use wayfarer_core::error::DomainError;
use wayfarer_core::rng::{DeterministicRng, roll_chance};
use wayfarer_core::time::{Clock, TurnNumber};
use wayfarer_world_state::domain::character::{HEALTH, STRESS};
use wayfarer_world_state::domain::context::ActionContext;
use wayfarer_world_state::domain::snapshot::StoryState;

use crate::domain::catalog::default_mechanics;
use crate::domain::failure::{FailureCategory, FailureType};
use crate::domain::mechanic::{RecoveryEffect, RecoveryMechanic};
use crate::domain::record::{RecoveryAttempt, RecoveryRecord, ResilienceStats};

const RECENT_WINDOW: usize = 5;

/// The recovery catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureRecoverySystem {
    /// Every known remedy.
    pub mechanics: Vec<RecoveryMechanic>,
}

impl Default for FailureRecoverySystem {
    fn default() -> Self {
        Self {
            mechanics: default_mechanics(),
        }
    }
}

/// Classifies an action's outcome into at most one failure.
#[must_use]
pub fn detect_failure(action: &str, outcome: &str, context: &ActionContext) -> Option<FailureType> {
    let category = FailureCategory::classify(context)?;
    let description = match (action.trim(), outcome.trim()) {
        ("", "") => format!("{category:?}"),
        (action, "") => action.to_owned(),
        ("", outcome) => outcome.to_owned(),
        (action, outcome) => format!("{action}: {outcome}"),
    };
    Some(FailureType::new(category, description))
}

impl FailureRecoverySystem {
    /// Looks up a remedy.
    #[must_use]
    pub fn mechanic(&self, mechanic_id: &str) -> Option<&RecoveryMechanic> {
        self.mechanics.iter().find(|m| m.id == mechanic_id)
    }

    /// Remedies that address the failure and that the character can use
    /// right now, on the state's current turn.
    #[must_use]
    pub fn generate_recovery_options(
        &self,
        failure: &FailureType,
        state: &StoryState,
    ) -> Vec<RecoveryMechanic> {
        self.mechanics
            .iter()
            .filter(|m| ineligibility(m, failure, state, state.turn).is_none())
            .cloned()
            .collect()
    }

    /// Attempts a remedy. The cost is paid whatever the outcome; the
    /// mechanic's effects apply only on success.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownMechanic` if the identifier is not in the
    /// catalogue, or `DomainError::Validation` if the remedy does not address
    /// this failure, its window has closed, or the character cannot use it.
    pub fn attempt_recovery(
        &self,
        mechanic_id: &str,
        failure: &FailureType,
        state: &StoryState,
        turn: TurnNumber,
        clock: &dyn Clock,
        rng: &mut dyn DeterministicRng,
    ) -> Result<RecoveryAttempt, DomainError> {
        let mechanic = self
            .mechanic(mechanic_id)
            .ok_or_else(|| DomainError::UnknownMechanic(mechanic_id.to_owned()))?;
        if let Some(reason) = ineligibility(mechanic, failure, state, turn) {
            return Err(DomainError::Validation(format!(
                "recovery {mechanic_id} unavailable: {reason}"
            )));
        }

        let success = roll_chance(rng, clamp_score(mechanic.success_chance) / 100.0);

        let mut next = state.clone();
        next.character.currency = next.character.currency.saturating_sub(mechanic.cost);
        let mut descriptions = Vec::new();
        if mechanic.cost > 0 {
            descriptions.push(format!("Paid {} coin for {}", mechanic.cost, mechanic.name));
        }
        if success {
            for effect in &mechanic.effects {
                let (applied, description) = apply_effect(next, effect, &mechanic.name, turn);
                next = applied;
                descriptions.push(description);
            }
        } else {
            descriptions.push(format!("{} failed", mechanic.name));
        }

        let record = RecoveryRecord {
            id: Uuid::new_v4(),
            failure: failure.category,
            mechanic_id: mechanic.id.clone(),
            success,
            lessons: lessons_learned(mechanic, failure.category, success),
            satisfaction: satisfaction(mechanic.success_chance, success),
            turn,
            recorded_at: clock.now(),
        };

        info!(
            mechanic_id = %mechanic.id,
            failure = ?failure.category,
            success,
            turn,
            "recovery attempted"
        );

        Ok(RecoveryAttempt {
            state: next,
            record,
            descriptions,
        })
    }
}

/// Resilience, adaptability and learning rate derived from the history.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_player_resilience(history: &[RecoveryRecord]) -> ResilienceStats {
    if history.is_empty() {
        return ResilienceStats::default();
    }
    let success_rate = |records: &[RecoveryRecord]| {
        records.iter().filter(|r| r.success).count() as f64 / records.len() as f64 * 100.0
    };
    let overall = success_rate(history);
    let recent = success_rate(&history[history.len().saturating_sub(RECENT_WINDOW)..]);
    let adaptability =
        history.iter().map(|r| clamp_score(r.satisfaction)).sum::<f64>() / history.len() as f64;

    ResilienceStats {
        resilience: overall,
        adaptability,
        learning_rate: (50.0 + 2.0 * (recent - overall)).max(0.0),
        attempts: history.len(),
    }
}

fn ineligibility(
    mechanic: &RecoveryMechanic,
    failure: &FailureType,
    state: &StoryState,
    now: TurnNumber,
) -> Option<String> {
    if !mechanic.applies_to(failure.category) {
        return Some(format!("does not address {:?}", failure.category));
    }
    if let Some(limit) = mechanic.time_limit {
        let age = failure.age(now);
        if age > limit {
            return Some(format!("window closed {age} turns after the failure (limit {limit})"));
        }
    }
    if state.character.currency < mechanic.cost {
        return Some(format!("costs {} coin", mechanic.cost));
    }
    if let Some(location) = &mechanic.requirements.location {
        if state.location != *location {
            return Some(format!("only available at {location}"));
        }
    }
    if state.character.level < mechanic.requirements.min_level {
        return Some(format!("requires level {}", mechanic.requirements.min_level));
    }
    None
}

fn apply_effect(
    state: StoryState,
    effect: &RecoveryEffect,
    source: &str,
    turn: TurnNumber,
) -> (StoryState, String) {
    match effect {
        RecoveryEffect::RestoreHealth { amount } => {
            let character = state.character.clone().with_stat_delta(HEALTH, *amount);
            (StoryState { character, ..state }, format!("Recovered {amount} health"))
        }
        RecoveryEffect::ReduceStress { amount } => {
            let character = state.character.clone().with_stat_delta(STRESS, -amount);
            (StoryState { character, ..state }, format!("Stress eased by {amount}"))
        }
        RecoveryEffect::GrantItem {
            item_id,
            name,
            quantity,
        } => (
            state.with_item_added(item_id, name, *quantity),
            format!("Found {quantity} x {name}"),
        ),
        RecoveryEffect::GrantCurrency { amount } => {
            let mut next = state;
            next.character.currency = next.character.currency.saturating_add(*amount);
            (next, format!("Received {amount} coin"))
        }
        RecoveryEffect::MendRelationship { npc_id, amount } => {
            let npc = state
                .npc_or_stranger(npc_id)
                .with_relationship_delta(*amount, source, turn);
            (state.with_npc(npc), format!("{npc_id} softens toward you (+{amount})"))
        }
        RecoveryEffect::WorldFact { fact } => {
            let mut next = state;
            if !next.has_fact(fact) {
                next.world_facts.push(fact.clone());
            }
            (next, format!("Learned: {fact}"))
        }
    }
}

/// Succeeding at a long shot satisfies more; failing one frustrates less.
fn satisfaction(success_chance: f64, success: bool) -> f64 {
    let long_odds = 100.0 - clamp_score(success_chance);
    if success {
        clamp_score(50.0 + long_odds / 2.0)
    } else {
        clamp_score(10.0 + long_odds / 4.0)
    }
}

fn lessons_learned(mechanic: &RecoveryMechanic, category: FailureCategory, success: bool) -> Vec<String> {
    let mut lessons = mechanic.lessons.clone();
    let hint = match category {
        FailureCategory::CombatDefeat => "Scout enemy numbers before engaging",
        FailureCategory::QuestFailure => "Watch quest deadlines and conditions",
        FailureCategory::ResourceDepletion => "Track supplies before they hit zero",
        FailureCategory::SocialFailure => "Know what the other side wants",
        FailureCategory::ExplorationFailure => "Carry a map or hire a guide",
    };
    lessons.push(hint.to_owned());
    if !success {
        lessons.push(format!("Have a fallback when {} fails", mechanic.name));
    }
    lessons
}
