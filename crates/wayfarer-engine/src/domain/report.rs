//! What the generator reports each turn, and what the engine reports back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_consequence::domain::choice::{ChoiceInput, PlayerChoice};
use wayfarer_consequence::domain::faction::PoliticalInfluence;
use wayfarer_consequence::domain::moral::MoralProfile;
use wayfarer_core::time::TurnNumber;
use wayfarer_economy::domain::reward::{BaseReward, ScaledReward};
use wayfarer_economy::domain::risk::RiskAssessment;
use wayfarer_economy::domain::scarcity::{ActiveScarcityEvent, ResourceWarning};
use wayfarer_performance::domain::difficulty::DifficultyProfile;
use wayfarer_performance::domain::metrics::{CombatReport, PerformanceMetrics, ResourceAction};
use wayfarer_quest::domain::failure::QuestFailureRecord;
use wayfarer_recovery::domain::failure::FailureType;
use wayfarer_recovery::domain::mechanic::RecoveryMechanic;
use wayfarer_world_state::domain::context::ActionContext;

/// A quest the generator says was finished or botched this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestOutcome {
    /// Quest identifier.
    pub quest_id: String,
    /// Whether it succeeded.
    pub success: bool,
}

/// One turn's worth of input from the narrative generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnInput {
    /// What the player did.
    pub action: String,
    /// What happened, as the generator tells it.
    pub outcome: String,
    /// Structured signals about the action.
    pub context: ActionContext,
    /// Combat that finished this turn.
    pub combat: Option<CombatReport>,
    /// Resources spent, gathered or crafted.
    pub resource_actions: Vec<ResourceAction>,
    /// Quests finished or botched.
    pub quest_outcomes: Vec<QuestOutcome>,
    /// Decision point reached this turn.
    pub choice: Option<ChoiceInput>,
    /// Reward earned, before scaling.
    pub reward: Option<BaseReward>,
    /// Faction the reward's reputation applies to.
    pub reward_faction: Option<String>,
    /// Extra reward for speed, `0` for none.
    pub time_bonus: f64,
    /// Turns this input covers.
    pub turns_passed: u32,
}

impl Default for TurnInput {
    fn default() -> Self {
        Self {
            action: String::new(),
            outcome: String::new(),
            context: ActionContext::default(),
            combat: None,
            resource_actions: Vec::new(),
            quest_outcomes: Vec::new(),
            choice: None,
            reward: None,
            reward_faction: None,
            time_bonus: 0.0,
            turns_passed: 1,
        }
    }
}

/// Consolidated result of one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Session.
    pub session_id: Uuid,
    /// Turn processed.
    pub turn: TurnNumber,
    /// Metrics after the turn.
    pub metrics: PerformanceMetrics,
    /// Difficulty for the next encounter.
    pub difficulty: DifficultyProfile,
    /// Scarcity events in force.
    pub scarcity_events: Vec<ActiveScarcityEvent>,
    /// Scarcity events that began this turn.
    pub new_scarcity_events: Vec<String>,
    /// Scarcity events that ran out this turn.
    pub expired_scarcity_events: Vec<String>,
    /// Resources running short.
    pub resource_warnings: Vec<ResourceWarning>,
    /// Risk of the action taken.
    pub risk: RiskAssessment,
    /// Scaled reward, when one was earned.
    pub reward: Option<ScaledReward>,
    /// Failure detected this turn.
    pub failure: Option<FailureType>,
    /// Remedies the player can use for it.
    pub recovery_options: Vec<RecoveryMechanic>,
    /// Choice recorded this turn.
    pub choice: Option<PlayerChoice>,
    /// Human-readable effects, in the order they landed.
    pub effects: Vec<String>,
    /// Moral profile after the turn.
    pub moral_profile: MoralProfile,
    /// Political picture after the turn.
    pub political_influence: PoliticalInfluence,
    /// Quests that failed this turn.
    pub quest_failures: Vec<QuestFailureRecord>,
    /// Open branch identifiers per active quest.
    pub available_branches: BTreeMap<String, Vec<String>>,
}
