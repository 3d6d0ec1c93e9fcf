//! Typed consequence effects.

use serde::{Deserialize, Serialize};

/// One change a consequence makes to the story state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsequenceEffect {
    /// A character stat changes. `health`, `stress`, `currency` and
    /// `experience` route to their dedicated fields.
    StatDelta {
        /// Stat name.
        stat: String,
        /// Signed change.
        delta: i32,
    },
    /// An NPC's opinion of the player changes.
    RelationshipDelta {
        /// NPC identifier.
        npc_id: String,
        /// Signed change.
        delta: i32,
    },
    /// The player's reputation with a faction changes.
    FactionDelta {
        /// Faction identifier.
        faction_id: String,
        /// Signed change.
        delta: i32,
    },
    /// A world fact becomes true.
    WorldFactAdded {
        /// The fact.
        fact: String,
    },
    /// A world fact stops being true.
    WorldFactRemoved {
        /// The fact.
        fact: String,
    },
    /// A quest is closed off and marked failed.
    QuestLock {
        /// Quest identifier.
        quest_id: String,
    },
    /// Items are added to the inventory.
    ItemGained {
        /// Item identifier.
        item_id: String,
        /// Display name.
        name: String,
        /// Units gained.
        quantity: u32,
    },
    /// Items are removed from the inventory.
    ItemLost {
        /// Item identifier.
        item_id: String,
        /// Units lost.
        quantity: u32,
    },
    /// The character is moved.
    LocationChange {
        /// New location.
        location: String,
    },
    /// An NPC takes on a new goal.
    NpcGoalUpdate {
        /// NPC identifier.
        npc_id: String,
        /// The goal.
        goal: String,
    },
}

impl ConsequenceEffect {
    /// The effect that undoes this one, for effects that can be undone.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        match self {
            Self::StatDelta { stat, delta } => Some(Self::StatDelta {
                stat: stat.clone(),
                delta: delta.saturating_neg(),
            }),
            Self::RelationshipDelta { npc_id, delta } => Some(Self::RelationshipDelta {
                npc_id: npc_id.clone(),
                delta: delta.saturating_neg(),
            }),
            Self::FactionDelta { faction_id, delta } => Some(Self::FactionDelta {
                faction_id: faction_id.clone(),
                delta: delta.saturating_neg(),
            }),
            Self::WorldFactAdded { fact } => Some(Self::WorldFactRemoved { fact: fact.clone() }),
            Self::WorldFactRemoved { fact } => Some(Self::WorldFactAdded { fact: fact.clone() }),
            Self::ItemGained {
                item_id, quantity, ..
            } => Some(Self::ItemLost {
                item_id: item_id.clone(),
                quantity: *quantity,
            }),
            Self::ItemLost { item_id, quantity } => Some(Self::ItemGained {
                item_id: item_id.clone(),
                name: item_id.clone(),
                quantity: *quantity,
            }),
            Self::QuestLock { .. } | Self::LocationChange { .. } | Self::NpcGoalUpdate { .. } => None,
        }
    }
}

/// How heavily a consequence lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsequenceSeverity {
    /// Flavour.
    #[default]
    Minor,
    /// Noticeable.
    Moderate,
    /// Changes the story.
    Major,
    /// Changes the world.
    Critical,
}

/// What part of the story a consequence touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsequenceCategory {
    /// The character.
    #[default]
    Personal,
    /// Relationships with NPCs.
    Social,
    /// Factions and power.
    Political,
    /// Money and goods.
    Economic,
    /// The world at large.
    World,
}

/// How much the player knows about a consequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Awareness {
    /// The player has no idea.
    Hidden,
    /// The player has hints.
    Suspected,
    /// The player knows.
    #[default]
    Known,
}

/// A consequence declared by the narrative generator for a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequence {
    /// Identifier, unique within its choice.
    pub id: String,
    /// Narrative description.
    #[serde(default)]
    pub description: String,
    /// Effects, applied in order.
    #[serde(default)]
    pub effects: Vec<ConsequenceEffect>,
    /// Severity.
    #[serde(default)]
    pub severity: ConsequenceSeverity,
    /// Category.
    #[serde(default)]
    pub category: ConsequenceCategory,
    /// Player awareness.
    #[serde(default)]
    pub awareness: Awareness,
    /// Whether the consequence can be reverted later.
    #[serde(default = "default_reversible")]
    pub reversible: bool,
    /// Turns before the consequence manifests; zero is immediate.
    #[serde(default)]
    pub delay_turns: u32,
}

fn default_reversible() -> bool {
    true
}

impl Consequence {
    /// An immediate, reversible, known consequence.
    #[must_use]
    pub fn new(id: impl Into<String>, effects: Vec<ConsequenceEffect>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            effects,
            severity: ConsequenceSeverity::default(),
            category: ConsequenceCategory::default(),
            awareness: Awareness::default(),
            reversible: true,
            delay_turns: 0,
        }
    }
}
