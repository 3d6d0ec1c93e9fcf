//! Recovery mechanics: remedies for a failure.

use serde::{Deserialize, Serialize};

use super::failure::FailureCategory;

/// What a successful recovery restores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecoveryEffect {
    /// Heal hit points.
    RestoreHealth {
        /// Hit points restored.
        amount: i32,
    },
    /// Calm down.
    ReduceStress {
        /// Stress removed.
        amount: i32,
    },
    /// Receive items.
    GrantItem {
        /// Item identifier.
        item_id: String,
        /// Display name.
        name: String,
        /// Units received.
        quantity: u32,
    },
    /// Receive coin.
    GrantCurrency {
        /// Coin received.
        amount: u64,
    },
    /// Mend an NPC relationship.
    MendRelationship {
        /// NPC identifier.
        npc_id: String,
        /// Relationship gained.
        amount: i32,
    },
    /// A world fact becomes true.
    WorldFact {
        /// The fact.
        fact: String,
    },
}

/// Preconditions beyond cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryRequirements {
    /// The character must be here.
    pub location: Option<String>,
    /// Minimum character level, standing in for a skill check.
    pub min_level: u32,
}

/// A catalogued remedy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryMechanic {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Narrative description.
    #[serde(default)]
    pub description: String,
    /// Failures this remedy applies to.
    pub applies_to: Vec<FailureCategory>,
    /// Chance of success in `[0, 100]`.
    pub success_chance: f64,
    /// Coin paid whether or not the attempt succeeds.
    #[serde(default)]
    pub cost: u64,
    /// Turns the player has to attempt it.
    #[serde(default)]
    pub time_limit: Option<u32>,
    /// Location and level preconditions.
    #[serde(default)]
    pub requirements: RecoveryRequirements,
    /// Applied on success.
    #[serde(default)]
    pub effects: Vec<RecoveryEffect>,
    /// What the player should take away.
    #[serde(default)]
    pub lessons: Vec<String>,
}

impl RecoveryMechanic {
    /// Whether the remedy addresses `category`.
    #[must_use]
    pub fn applies_to(&self, category: FailureCategory) -> bool {
        self.applies_to.contains(&category)
    }
}
