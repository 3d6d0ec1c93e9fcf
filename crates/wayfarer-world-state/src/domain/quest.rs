//! Quests, their branches and the typed condition language they use.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::time::TurnNumber;

use super::moral::MoralTag;

/// Quest lifecycle. `Completed` and `Failed` are terminal, except that a
/// failed quest may be explicitly reactivated after a successful recovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Known but not yet taken up.
    #[default]
    NotStarted,
    /// In progress.
    Active,
    /// Finished successfully.
    Completed,
    /// Failed or locked out.
    Failed,
}

/// A single predicate over the story state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestCondition {
    /// Another quest has been completed.
    QuestCompletion {
        /// Quest that must be completed.
        quest_id: String,
    },
    /// Character level is at least `min_level`.
    LevelRequirement {
        /// Minimum level.
        min_level: u32,
    },
    /// A skill rank is at least `min`.
    SkillRequirement {
        /// Skill name.
        skill: String,
        /// Minimum rank.
        min: i32,
    },
    /// The pack holds at least `quantity` of an item.
    ItemPossession {
        /// Item identifier.
        item_id: String,
        /// Minimum stack size.
        quantity: u32,
    },
    /// An NPC's opinion is at least `min`.
    RelationshipLevel {
        /// NPC identifier.
        npc_id: String,
        /// Minimum relationship.
        min: i32,
    },
    /// Reputation with a faction is at least `min`.
    FactionStanding {
        /// Faction identifier.
        faction_id: String,
        /// Minimum reputation.
        min: i32,
    },
    /// The player has been to a location.
    LocationVisit {
        /// Location name.
        location: String,
    },
    /// A branch with this identifier has been chosen in any quest.
    ChoiceMade {
        /// Branch identifier.
        choice_id: String,
    },
    /// An attribute score is at least `min`.
    StatCheck {
        /// Attribute name.
        stat: String,
        /// Minimum score.
        min: i32,
    },
    /// No more than `turns` have passed since the quest started.
    TimeLimit {
        /// Allowed turns.
        turns: u32,
    },
}

/// A gate on starting a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestPrerequisite {
    /// Condition that must hold.
    pub condition: QuestCondition,
    /// Optional prerequisites never block the quest.
    #[serde(default)]
    pub optional: bool,
    /// Player-facing explanation.
    #[serde(default)]
    pub description: String,
}

impl QuestPrerequisite {
    /// A mandatory prerequisite.
    #[must_use]
    pub fn required(condition: QuestCondition) -> Self {
        Self {
            condition,
            optional: false,
            description: String::new(),
        }
    }
}

/// What a quest (or branch) pays out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestRewards {
    /// Experience points.
    pub experience: u64,
    /// Coin.
    pub currency: u64,
    /// Item identifiers.
    pub items: Vec<String>,
    /// Reputation changes keyed by faction.
    pub reputation: BTreeMap<String, i32>,
}

/// One mutually exclusive path through a quest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestBranch {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What taking this path means.
    pub description: String,
    /// All must hold for the branch to be offered.
    pub conditions: Vec<QuestCondition>,
    /// Branches that cannot coexist with this one.
    pub exclusive_with: Vec<String>,
    /// Turns after the quest's first choice during which the branch stays open.
    pub time_limit: Option<u32>,
    /// Objectives that replace the quest's when the branch is taken.
    pub objectives: Vec<String>,
    /// Rewards that replace the quest's when the branch is taken.
    pub rewards: QuestRewards,
    /// Explicit moral colouring; inferred from the description when absent.
    pub moral_tag: Option<MoralTag>,
}

/// A circumstance that fails an active quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestFailureCondition {
    /// More than `turns` have passed since the quest started.
    TimeLimit {
        /// Allowed turns.
        turns: u32,
    },
    /// The character has died.
    CharacterDeath,
    /// A required item is no longer carried.
    ItemLost {
        /// Item identifier.
        item_id: String,
    },
    /// An NPC's opinion fell below `threshold`.
    RelationshipBelow {
        /// NPC identifier.
        npc_id: String,
        /// Failure threshold.
        threshold: i32,
    },
    /// Reputation with a faction fell below `threshold`.
    FactionBelow {
        /// Faction identifier.
        faction_id: String,
        /// Failure threshold.
        threshold: i32,
    },
    /// A tracked NPC has died.
    NpcDeath {
        /// NPC identifier.
        npc_id: String,
    },
}

/// An immutable record of a committed branch choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestChoice {
    /// Unique identifier.
    pub id: Uuid,
    /// Quest the choice was made in.
    pub quest_id: String,
    /// Branch that was taken.
    pub branch_id: String,
    /// Turn of the choice.
    pub turn: TurnNumber,
    /// Moral colouring of the branch.
    pub moral_tag: MoralTag,
    /// Difficulty score in `[0, 100]`.
    pub difficulty: u8,
    /// When the choice was recorded.
    pub made_at: DateTime<Utc>,
}

/// A trackable objective with branching paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quest {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Summary.
    pub description: String,
    /// Lifecycle state.
    pub status: QuestStatus,
    /// Urgent quests add to the pressure the player is under.
    pub urgent: bool,
    /// Turn the quest became active.
    pub started_turn: Option<TurnNumber>,
    /// Current objectives.
    pub objectives: Vec<String>,
    /// Current rewards.
    pub rewards: QuestRewards,
    /// Gates on starting the quest.
    pub prerequisites: Vec<QuestPrerequisite>,
    /// Declared branches.
    pub branches: Vec<QuestBranch>,
    /// The single branch in effect, if one has been chosen.
    pub active_branch: Option<String>,
    /// Circumstances that fail the quest.
    pub failure_conditions: Vec<QuestFailureCondition>,
    /// Append-only record of branch choices.
    pub choice_history: Vec<QuestChoice>,
}

impl Quest {
    /// A not-started quest with no branches.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether the quest is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == QuestStatus::Active
    }

    /// Looks up a declared branch.
    #[must_use]
    pub fn branch(&self, branch_id: &str) -> Option<&QuestBranch> {
        self.branches.iter().find(|b| b.id == branch_id)
    }

    /// Turns left before the tightest quest time limit runs out, when the
    /// quest has started and carries one.
    #[must_use]
    pub fn turns_remaining(&self, now: TurnNumber) -> Option<u32> {
        let started = self.started_turn?;
        self.failure_conditions
            .iter()
            .filter_map(|c| match c {
                QuestFailureCondition::TimeLimit { turns } => {
                    Some(started.saturating_add(*turns).saturating_sub(now))
                }
                _ => None,
            })
            .min()
    }

    /// Turn from which branch time limits are counted: the first recorded
    /// choice, falling back to the start turn.
    #[must_use]
    pub fn branch_clock_anchor(&self) -> Option<TurnNumber> {
        self.choice_history
            .first()
            .map(|c| c.turn)
            .or(self.started_turn)
    }
}
