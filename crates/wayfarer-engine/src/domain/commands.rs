//! Commands accepted by the coordinator.

use uuid::Uuid;
use wayfarer_consequence::domain::faction::{ConflictResolution, PowerShift};
use wayfarer_core::command::Command;

use super::report::TurnInput;

macro_rules! command {
    ($name:ident, $kind:literal) => {
        impl Command for $name {
            fn command_type(&self) -> &'static str {
                $kind
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }
        }
    };
}

/// Command to run one turn through every context.
#[derive(Debug, Clone)]
pub struct ProcessTurn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// What the generator reported.
    pub input: TurnInput,
}

impl ProcessTurn {
    /// Wraps a turn input with a fresh correlation ID.
    #[must_use]
    pub fn new(input: TurnInput) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            input,
        }
    }
}

/// Command to spend one resource for another.
#[derive(Debug, Clone)]
pub struct ExecuteTradeoff {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Trade-off to execute.
    pub tradeoff_id: String,
}

/// Command to try a remedy for the active failure.
#[derive(Debug, Clone)]
pub struct AttemptRecovery {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Remedy to attempt.
    pub mechanic_id: String,
}

/// Command to commit to a quest branch.
#[derive(Debug, Clone)]
pub struct SelectQuestBranch {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quest.
    pub quest_id: String,
    /// The branch.
    pub branch_id: String,
}

/// Command to take up a quest.
#[derive(Debug, Clone)]
pub struct StartQuest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quest.
    pub quest_id: String,
}

/// Command to mark a quest completed.
#[derive(Debug, Clone)]
pub struct CompleteQuest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quest.
    pub quest_id: String,
}

/// Command to bring a failed quest back after recovery.
#[derive(Debug, Clone)]
pub struct ReactivateQuest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quest.
    pub quest_id: String,
}

/// Command to put coin into a venture.
#[derive(Debug, Clone)]
pub struct OpenInvestment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Venture name.
    pub name: String,
    /// Coin committed.
    pub principal: u64,
    /// Risk in `[0, 100]`.
    pub risk_level: f64,
}

/// Command to cash out an investment.
#[derive(Debug, Clone)]
pub struct ResolveInvestment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The investment.
    pub investment_id: Uuid,
}

/// Command to set two factions against each other.
#[derive(Debug, Clone)]
pub struct CreateFactionConflict {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// First party.
    pub faction_a: String,
    /// Second party.
    pub faction_b: String,
    /// What the conflict is about.
    pub description: String,
    /// Power shifts the outbreak applies.
    pub consequences: Vec<PowerShift>,
}

/// Command to settle a faction conflict.
#[derive(Debug, Clone)]
pub struct ResolveFactionConflict {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The conflict.
    pub conflict_id: Uuid,
    /// How it ends.
    pub resolution: ConflictResolution,
}

/// Command to undo a manifested consequence.
#[derive(Debug, Clone)]
pub struct RevertConsequence {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Choice the consequence belongs to.
    pub choice_id: Uuid,
    /// The consequence.
    pub consequence_id: String,
}

command!(ProcessTurn, "engine.process_turn");
command!(ExecuteTradeoff, "economy.execute_tradeoff");
command!(AttemptRecovery, "recovery.attempt_recovery");
command!(SelectQuestBranch, "quest.select_branch");
command!(StartQuest, "quest.start");
command!(CompleteQuest, "quest.complete");
command!(ReactivateQuest, "quest.reactivate");
command!(OpenInvestment, "economy.open_investment");
command!(ResolveInvestment, "economy.resolve_investment");
command!(CreateFactionConflict, "consequence.create_faction_conflict");
command!(ResolveFactionConflict, "consequence.resolve_faction_conflict");
command!(RevertConsequence, "consequence.revert_consequence");
