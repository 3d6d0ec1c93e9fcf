//! Player choices and the consequences traced back to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::time::TurnNumber;
use wayfarer_world_state::domain::moral::MoralTag;
use wayfarer_world_state::domain::snapshot::StoryState;

use super::effect::{
    Awareness, Consequence, ConsequenceCategory, ConsequenceEffect, ConsequenceSeverity,
};

/// A decision the narrative generator reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceInput {
    /// What the player chose, as text.
    pub text: String,
    /// Longer description of the decision point.
    pub description: String,
    /// Options the player passed over.
    pub alternatives: Vec<String>,
    /// Explicit moral tag; inferred from the text when absent.
    pub moral_tag: Option<MoralTag>,
    /// Consequences declared for this choice.
    pub consequences: Vec<Consequence>,
}

/// Snapshot of the circumstances a choice was made in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceContext {
    /// Where it happened.
    pub location: String,
    /// Character health as a share of maximum.
    pub health_ratio: f64,
    /// Character stress.
    pub stress: i32,
    /// Active quest identifiers.
    pub active_quests: Vec<String>,
    /// Urgent active quests.
    pub urgent_quests: usize,
}

impl ChoiceContext {
    /// Captures the relevant parts of the story state.
    #[must_use]
    pub fn capture(location: &str, state: &StoryState) -> Self {
        Self {
            location: location.to_owned(),
            health_ratio: state.character.health_ratio(),
            stress: state.character.stress,
            active_quests: state.active_quests().map(|q| q.id.clone()).collect(),
            urgent_quests: state.urgent_quest_count(),
        }
    }
}

/// A manifested consequence, as traced on its choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceConsequenceTracking {
    /// Consequence identifier.
    pub consequence_id: String,
    /// Narrative description.
    pub description: String,
    /// Severity.
    pub severity: ConsequenceSeverity,
    /// Category.
    pub category: ConsequenceCategory,
    /// Player awareness.
    pub awareness: Awareness,
    /// Whether it may be reverted.
    pub reversible: bool,
    /// Effects as they actually landed, after clamping.
    pub applied_effects: Vec<ConsequenceEffect>,
    /// Turn it manifested.
    pub manifested_turn: TurnNumber,
    /// Whether it has been reverted.
    pub reverted: bool,
}

/// A recorded decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerChoice {
    /// Identifier.
    pub id: Uuid,
    /// What the player chose.
    pub text: String,
    /// Longer description.
    pub description: String,
    /// Options passed over.
    pub alternatives: Vec<String>,
    /// Circumstances.
    pub context: ChoiceContext,
    /// Moral colouring.
    pub moral_tag: MoralTag,
    /// Pressure the player was under, in `[0, 100]`.
    pub pressure: f64,
    /// How hard the decision was, in `[0, 100]`.
    pub difficulty: u8,
    /// Turn of the decision.
    pub turn: TurnNumber,
    /// When it was recorded.
    pub made_at: DateTime<Utc>,
    /// Manifested consequences; only ever appended to.
    pub consequences: Vec<ChoiceConsequenceTracking>,
}

impl PlayerChoice {
    /// Looks up a manifested consequence.
    #[must_use]
    pub fn tracking(&self, consequence_id: &str) -> Option<&ChoiceConsequenceTracking> {
        self.consequences
            .iter()
            .find(|c| c.consequence_id == consequence_id)
    }
}

/// Result of manifesting or reverting a consequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestOutcome {
    /// Story state after the effects.
    pub state: StoryState,
    /// Choice with its tracking updated.
    pub choice: PlayerChoice,
    /// Human-readable effects.
    pub descriptions: Vec<String>,
}
