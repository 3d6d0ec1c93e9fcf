//! Turn events emitted by the coordinator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_consequence::domain::effect::ConsequenceEffect;
use wayfarer_consequence::domain::moral::Alignment;
use wayfarer_core::event::{DomainEvent, EventMetadata};
use wayfarer_core::time::TurnNumber;
use wayfarer_economy::domain::investment::{Investment, InvestmentReturn};
use wayfarer_economy::domain::reward::ScaledReward;
use wayfarer_performance::domain::difficulty::DifficultyProfile;
use wayfarer_quest::domain::failure::QuestFailureRecord;
use wayfarer_recovery::domain::failure::FailureType;
use wayfarer_recovery::domain::record::RecoveryRecord;
use wayfarer_world_state::domain::moral::MoralTag;

/// Emitted once a turn has run through every context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnProcessed {
    /// The turn.
    pub turn: TurnNumber,
    /// Composite performance after the turn.
    pub overall_performance: f64,
    /// Difficulty for the next encounter.
    pub difficulty: DifficultyProfile,
}

/// Emitted when a scarcity event begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScarcityStarted {
    /// Event name.
    pub name: String,
    /// Resource affected.
    pub resource_id: String,
    /// Turns it will last.
    pub duration: u32,
}

/// Emitted when a scarcity event runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScarcityEnded {
    /// Event name.
    pub name: String,
}

/// Emitted when a scaled reward is paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardGranted {
    /// The reward.
    pub reward: ScaledReward,
}

/// Emitted when an action is classified as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetected {
    /// The failure.
    pub failure: FailureType,
}

/// Emitted when a decision point is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRecorded {
    /// The choice.
    pub choice_id: Uuid,
    /// Its moral tag.
    pub moral_tag: MoralTag,
    /// How hard it was.
    pub difficulty: u8,
}

/// Emitted when a consequence is put off to a later turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsequenceScheduled {
    /// Owning choice.
    pub choice_id: Uuid,
    /// Consequence.
    pub consequence_id: String,
    /// Turn it will manifest.
    pub due_turn: TurnNumber,
}

/// Emitted when a consequence lands on the story state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsequenceManifested {
    /// Owning choice.
    pub choice_id: Uuid,
    /// Consequence.
    pub consequence_id: String,
    /// Effects as they landed.
    pub effects: Vec<ConsequenceEffect>,
}

/// Emitted when a consequence is undone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsequenceReverted {
    /// Owning choice.
    pub choice_id: Uuid,
    /// Consequence.
    pub consequence_id: String,
}

/// Emitted when the moral alignment moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentShifted {
    /// Alignment before.
    pub from: Alignment,
    /// Alignment after.
    pub to: Alignment,
}

/// Emitted on a quest lifecycle transition that carries only the quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestTransition {
    /// The quest.
    pub quest_id: String,
}

/// Emitted when the player commits to a quest branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestBranchSelected {
    /// The quest.
    pub quest_id: String,
    /// The branch.
    pub branch_id: String,
    /// Moral colouring of the branch.
    pub moral_tag: MoralTag,
}

/// Emitted when a quest fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestFailed {
    /// The failure record.
    pub record: QuestFailureRecord,
}

/// Emitted when a trade-off is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeoffExecuted {
    /// The trade-off.
    pub tradeoff_id: String,
    /// Whether its benefit was granted.
    pub benefit_granted: bool,
}

/// Emitted when a recovery is attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryAttempted {
    /// The attempt record.
    pub record: RecoveryRecord,
}

/// Emitted when coin is put into an investment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentOpened {
    /// The investment.
    pub investment: Investment,
}

/// Emitted when an investment pays out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResolved {
    /// The outcome.
    pub outcome: InvestmentReturn,
}

/// Emitted when two factions come into conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionConflictStarted {
    /// The conflict.
    pub conflict_id: Uuid,
    /// First party.
    pub faction_a: String,
    /// Second party.
    pub faction_b: String,
}

/// Emitted when a faction conflict is settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionConflictResolved {
    /// The conflict.
    pub conflict_id: Uuid,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEventKind {
    TurnProcessed(TurnProcessed),
    ScarcityStarted(ScarcityStarted),
    ScarcityEnded(ScarcityEnded),
    RewardGranted(RewardGranted),
    FailureDetected(FailureDetected),
    ChoiceRecorded(ChoiceRecorded),
    ConsequenceScheduled(ConsequenceScheduled),
    ConsequenceManifested(ConsequenceManifested),
    ConsequenceReverted(ConsequenceReverted),
    AlignmentShifted(AlignmentShifted),
    QuestStarted(QuestTransition),
    QuestBranchSelected(QuestBranchSelected),
    QuestCompleted(QuestTransition),
    QuestFailed(QuestFailed),
    QuestReactivated(QuestTransition),
    TradeoffExecuted(TradeoffExecuted),
    RecoveryAttempted(RecoveryAttempted),
    InvestmentOpened(InvestmentOpened),
    InvestmentResolved(InvestmentResolved),
    FactionConflictStarted(FactionConflictStarted),
    FactionConflictResolved(FactionConflictResolved),
}

impl EngineEventKind {
    /// Routing name of the event.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TurnProcessed(_) => "engine.turn_processed",
            Self::ScarcityStarted(_) => "economy.scarcity_started",
            Self::ScarcityEnded(_) => "economy.scarcity_ended",
            Self::RewardGranted(_) => "economy.reward_granted",
            Self::TradeoffExecuted(_) => "economy.tradeoff_executed",
            Self::InvestmentOpened(_) => "economy.investment_opened",
            Self::InvestmentResolved(_) => "economy.investment_resolved",
            Self::FailureDetected(_) => "recovery.failure_detected",
            Self::RecoveryAttempted(_) => "recovery.recovery_attempted",
            Self::ChoiceRecorded(_) => "consequence.choice_recorded",
            Self::ConsequenceScheduled(_) => "consequence.consequence_scheduled",
            Self::ConsequenceManifested(_) => "consequence.consequence_manifested",
            Self::ConsequenceReverted(_) => "consequence.consequence_reverted",
            Self::AlignmentShifted(_) => "consequence.alignment_shifted",
            Self::FactionConflictStarted(_) => "consequence.faction_conflict_started",
            Self::FactionConflictResolved(_) => "consequence.faction_conflict_resolved",
            Self::QuestStarted(_) => "quest.started",
            Self::QuestBranchSelected(_) => "quest.branch_selected",
            Self::QuestCompleted(_) => "quest.completed",
            Self::QuestFailed(_) => "quest.failed",
            Self::QuestReactivated(_) => "quest.reactivated",
        }
    }
}

/// Event envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: EngineEventKind,
}

impl DomainEvent for EngineEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
