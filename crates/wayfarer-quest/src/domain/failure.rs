//! Quest failure kinds and the records kept for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::time::TurnNumber;

/// Why a quest failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestFailureKind {
    /// The time limit ran out.
    TimeLimitExceeded {
        /// Allowed turns.
        limit: u32,
        /// Turns that actually passed.
        elapsed: u32,
    },
    /// The character died.
    CharacterDeath,
    /// A required item is gone.
    RequiredItemLost {
        /// Item identifier.
        item_id: String,
    },
    /// An NPC's opinion collapsed.
    RelationshipCollapsed {
        /// NPC identifier.
        npc_id: String,
        /// Relationship at the time of failure.
        relationship: i32,
    },
    /// Reputation with a faction collapsed.
    FactionStandingCollapsed {
        /// Faction identifier.
        faction_id: String,
        /// Reputation at the time of failure.
        reputation: i32,
    },
    /// A tracked NPC died.
    NpcDied {
        /// NPC identifier.
        npc_id: String,
    },
    /// The narrative reported the objective as botched.
    ObjectiveFailed,
}

impl QuestFailureKind {
    /// Player-facing summary.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::TimeLimitExceeded { limit, elapsed } => {
                format!("Ran out of time ({elapsed} turns against a limit of {limit})")
            }
            Self::CharacterDeath => "The character fell".to_owned(),
            Self::RequiredItemLost { item_id } => format!("Lost the required {item_id}"),
            Self::RelationshipCollapsed {
                npc_id,
                relationship,
            } => format!("{npc_id} turned away (relationship {relationship})"),
            Self::FactionStandingCollapsed {
                faction_id,
                reputation,
            } => format!("{faction_id} withdrew its trust (reputation {reputation})"),
            Self::NpcDied { npc_id } => format!("{npc_id} is dead"),
            Self::ObjectiveFailed => "The objective slipped away".to_owned(),
        }
    }

    /// Recovery options offered for this kind of failure. Identifiers match
    /// the recovery mechanic catalogue.
    #[must_use]
    pub fn recovery_options(&self) -> Vec<QuestRecoveryOption> {
        let options: &[(&str, &str)] = match self {
            Self::TimeLimitExceeded { .. } => &[
                ("seek_new_lead", "Find another way to reach the goal"),
                ("hire_tracker", "Pay someone to make up the lost ground"),
            ],
            Self::CharacterDeath => &[
                ("temple_healing", "Be carried to the temple"),
                ("second_wind", "Drag yourself back to your feet"),
            ],
            Self::RequiredItemLost { .. } => &[
                ("retrace_steps", "Search the road you came by"),
                ("hire_tracker", "Hire a tracker to recover it"),
            ],
            Self::RelationshipCollapsed { .. } => &[
                ("make_amends", "Apologise and make it right"),
                ("bribe_informant", "Find out what would win them back"),
            ],
            Self::FactionStandingCollapsed { .. } => &[
                ("make_amends", "Offer restitution to the faction"),
                ("bribe_informant", "Buy a friend on the inside"),
            ],
            Self::NpcDied { .. } => &[("seek_new_lead", "Find someone else who can help")],
            Self::ObjectiveFailed => &[
                ("seek_new_lead", "Look for another way in"),
                ("retrace_steps", "Go back over what went wrong"),
            ],
        };
        options
            .iter()
            .map(|(id, description)| QuestRecoveryOption {
                mechanic_id: (*id).to_owned(),
                description: (*description).to_owned(),
            })
            .collect()
    }
}

/// A way back from a quest failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecoveryOption {
    /// Recovery mechanic identifier.
    pub mechanic_id: String,
    /// What it involves.
    pub description: String,
}

/// An immutable record of a failed quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestFailureRecord {
    /// Identifier.
    pub id: Uuid,
    /// Quest that failed.
    pub quest_id: String,
    /// Why.
    pub kind: QuestFailureKind,
    /// Summary.
    pub description: String,
    /// Turn of failure.
    pub turn: TurnNumber,
    /// When it was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Offered ways back.
    pub recovery_options: Vec<QuestRecoveryOption>,
}
