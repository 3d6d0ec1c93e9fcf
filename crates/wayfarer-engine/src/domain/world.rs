//! The per-session world aggregate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_consequence::domain::choice::PlayerChoice;
use wayfarer_consequence::domain::faction::{Faction, FactionConflict};
use wayfarer_consequence::domain::moral::MoralProfile;
use wayfarer_consequence::domain::pending::PendingConsequence;
use wayfarer_economy::domain::investment::Investment;
use wayfarer_economy::domain::scarcity::ActiveScarcityEvent;
use wayfarer_economy::domain::tradeoff::TradeoffLedger;
use wayfarer_performance::domain::difficulty::DifficultyProfile;
use wayfarer_performance::domain::metrics::PerformanceMetrics;
use wayfarer_quest::domain::failure::QuestFailureRecord;
use wayfarer_recovery::domain::failure::FailureType;
use wayfarer_recovery::domain::record::RecoveryRecord;
use wayfarer_world_state::domain::snapshot::StoryState;

/// Everything the engine tracks for one session.
///
/// The coordinator is the only writer. Subcomponents receive slices of the
/// world and return new values that replace the old ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct World {
    /// Story snapshot.
    pub state: StoryState,
    /// Rolling performance.
    pub metrics: PerformanceMetrics,
    /// Difficulty in force for the next encounter.
    pub difficulty: DifficultyProfile,
    /// Scarcity events in force.
    pub scarcity_events: Vec<ActiveScarcityEvent>,
    /// Faction graph.
    pub factions: Vec<Faction>,
    /// Faction conflicts, open and settled.
    pub conflicts: Vec<FactionConflict>,
    /// Moral alignment trajectory.
    pub moral_profile: MoralProfile,
    /// Every recorded choice, oldest first.
    pub choices: Vec<PlayerChoice>,
    /// Consequences waiting for their turn.
    pub pending_consequences: Vec<PendingConsequence>,
    /// Failure the player has not yet recovered from.
    pub active_failure: Option<FailureType>,
    /// Every recovery attempt, oldest first.
    pub recovery_history: Vec<RecoveryRecord>,
    /// Trade-off usage.
    pub tradeoff_ledger: TradeoffLedger,
    /// Open investments.
    pub investments: Vec<Investment>,
    /// Every quest failure, oldest first.
    pub quest_failures: Vec<QuestFailureRecord>,
}

impl World {
    /// A fresh world around a story snapshot.
    #[must_use]
    pub fn new(state: StoryState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Adds factions to the graph.
    #[must_use]
    pub fn with_factions(mut self, factions: Vec<Faction>) -> Self {
        self.factions = factions;
        self
    }

    /// Looks up a recorded choice.
    #[must_use]
    pub fn choice(&self, choice_id: Uuid) -> Option<&PlayerChoice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    /// Replaces a recorded choice by identifier, appending it when new.
    pub fn store_choice(&mut self, choice: PlayerChoice) {
        match self.choices.iter_mut().find(|c| c.id == choice.id) {
            Some(slot) => *slot = choice,
            None => self.choices.push(choice),
        }
    }

    /// Looks up a conflict.
    #[must_use]
    pub fn conflict(&self, conflict_id: Uuid) -> Option<&FactionConflict> {
        self.conflicts.iter().find(|c| c.id == conflict_id)
    }
}
