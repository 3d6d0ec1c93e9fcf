//! Factions, their directed relationships, conflicts and goals.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use wayfarer_core::bounds::{clamp_score, push_capped, shift_relation};
use wayfarer_core::time::TurnNumber;

/// Entries kept per relationship history.
pub const RELATIONSHIP_HISTORY_CAP: usize = 20;
/// Power gained or lost per conflict power shift.
pub const POWER_SHIFT_AMOUNT: f64 = 10.0;
/// Power gained when a faction completes a goal.
pub const GOAL_COMPLETION_POWER: f64 = 5.0;

/// Label of one faction's view of another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipLabel {
    /// Below -90.
    AtWar,
    /// -90 to -76.
    Hostile,
    /// -75 to -26.
    Rival,
    /// -25 to 24.
    #[default]
    Neutral,
    /// 25 to 74.
    Friendly,
    /// 75 and above.
    Allied,
}

impl RelationshipLabel {
    /// Label for a relationship score.
    #[must_use]
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 75 => Self::Allied,
            s if s >= 25 => Self::Friendly,
            s if s >= -25 => Self::Neutral,
            s if s >= -75 => Self::Rival,
            s if s >= -90 => Self::Hostile,
            _ => Self::AtWar,
        }
    }
}

/// One change to a relationship edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipChange {
    /// Turn of the change.
    pub turn: TurnNumber,
    /// Requested delta.
    pub delta: i32,
    /// Score after clamping.
    pub resulting: i32,
    /// Why it changed.
    pub reason: String,
}

/// One faction's view of another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRelationship {
    /// The faction being viewed.
    pub target_id: String,
    /// Score in `[-100, 100]`.
    pub score: i32,
    /// Label derived from the score.
    pub label: RelationshipLabel,
    /// Most recent changes, capped.
    #[serde(default)]
    pub history: Vec<RelationshipChange>,
}

impl FactionRelationship {
    /// A neutral edge toward `target_id`.
    #[must_use]
    pub fn neutral(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            score: 0,
            label: RelationshipLabel::Neutral,
            history: Vec::new(),
        }
    }

    /// The edge after a clamped delta, relabelled, with one history entry.
    #[must_use]
    pub fn with_delta(&self, delta: i32, reason: &str, turn: TurnNumber) -> Self {
        let score = shift_relation(self.score, delta);
        Self {
            target_id: self.target_id.clone(),
            score,
            label: RelationshipLabel::from_score(score),
            history: push_capped(
                &self.history,
                RelationshipChange {
                    turn,
                    delta,
                    resulting: score,
                    reason: reason.to_owned(),
                },
                RELATIONSHIP_HISTORY_CAP,
            ),
        }
    }
}

/// Spheres a faction's influence is spread over, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluenceVector {
    /// Sway over rulers and law; weights political influence.
    pub political: f64,
    /// Trade and coin.
    pub economic: f64,
    /// Armed strength.
    pub military: f64,
    /// Popular regard.
    pub social: f64,
    /// Arcane reach.
    pub magical: f64,
    /// Spies and secrets.
    pub informational: f64,
}

/// Something a faction is working toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionGoal {
    /// Identifier.
    pub id: String,
    /// What the goal is.
    #[serde(default)]
    pub description: String,
    /// Progress in `[0, 100]`.
    #[serde(default)]
    pub progress: f64,
    /// Whether the goal has been reached.
    #[serde(default)]
    pub completed: bool,
}

/// A political or economic actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Power in `[0, 100]`. Out-of-range input is clamped on load.
    #[serde(default, deserialize_with = "clamped_score")]
    pub power_level: f64,
    /// Influence by sphere.
    #[serde(default)]
    pub influence: InfluenceVector,
    /// Outgoing relationship edges.
    #[serde(default)]
    pub relationships: Vec<FactionRelationship>,
    /// Goals.
    #[serde(default)]
    pub goals: Vec<FactionGoal>,
    /// What good standing earns the player.
    #[serde(default)]
    pub benefits: Vec<String>,
    /// What bad standing costs the player.
    #[serde(default)]
    pub consequences: Vec<String>,
}

impl Faction {
    /// A faction with the given power and no relationships.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, power_level: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            power_level: clamp_score(power_level),
            influence: InfluenceVector::default(),
            relationships: Vec::new(),
            goals: Vec::new(),
            benefits: Vec::new(),
            consequences: Vec::new(),
        }
    }

    /// This faction's view of `target_id`; neutral when never recorded.
    #[must_use]
    pub fn relationship(&self, target_id: &str) -> FactionRelationship {
        self.relationships
            .iter()
            .find(|r| r.target_id == target_id)
            .cloned()
            .unwrap_or_else(|| FactionRelationship::neutral(target_id))
    }

    /// Replaces (or appends) an outgoing edge.
    #[must_use]
    pub fn with_relationship(mut self, edge: FactionRelationship) -> Self {
        match self
            .relationships
            .iter_mut()
            .find(|r| r.target_id == edge.target_id)
        {
            Some(slot) => *slot = edge,
            None => self.relationships.push(edge),
        }
        self
    }

    /// Power after a shift, clamped.
    #[must_use]
    pub fn with_power_delta(mut self, delta: f64) -> Self {
        self.power_level = clamp_score(self.power_level + delta);
        self
    }
}

/// A structured change in a faction's power.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PowerShift {
    /// Loses power.
    Weaken {
        /// Faction affected.
        faction_id: String,
    },
    /// Gains power.
    Strengthen {
        /// Faction affected.
        faction_id: String,
    },
}

impl PowerShift {
    /// Reads a free-text consequence: "weakened" in the text weakens the
    /// faction, "strengthened" strengthens it, anything else is no shift.
    #[must_use]
    pub fn from_description(faction_id: &str, description: &str) -> Option<Self> {
        let text = description.to_lowercase();
        if text.contains("weakened") {
            Some(Self::Weaken {
                faction_id: faction_id.to_owned(),
            })
        } else if text.contains("strengthened") {
            Some(Self::Strengthen {
                faction_id: faction_id.to_owned(),
            })
        } else {
            None
        }
    }

    /// Faction affected.
    #[must_use]
    pub fn faction_id(&self) -> &str {
        match self {
            Self::Weaken { faction_id } | Self::Strengthen { faction_id } => faction_id,
        }
    }

    /// Signed power change.
    #[must_use]
    pub fn delta(&self) -> f64 {
        match self {
            Self::Weaken { .. } => -POWER_SHIFT_AMOUNT,
            Self::Strengthen { .. } => POWER_SHIFT_AMOUNT,
        }
    }
}

/// An open or settled conflict between two factions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionConflict {
    /// Identifier.
    pub id: Uuid,
    /// First party.
    pub faction_a: String,
    /// Second party.
    pub faction_b: String,
    /// What the conflict is about.
    pub description: String,
    /// Power shifts applied when the conflict broke out.
    pub consequences: Vec<PowerShift>,
    /// Turn it broke out.
    pub started_turn: TurnNumber,
    /// How it was settled, once settled.
    pub resolution: Option<ConflictResolution>,
    /// Turn it was settled.
    pub resolved_turn: Option<TurnNumber>,
}

impl FactionConflict {
    /// Whether the conflict has been settled.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }
}

/// How a conflict ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolution {
    /// What happened.
    pub description: String,
    /// Power shifts the settlement applies.
    #[serde(default)]
    pub consequences: Vec<PowerShift>,
}

/// Aggregate political picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliticalInfluence {
    /// Each faction's share of political power, summing to one.
    pub shares: BTreeMap<String, f64>,
    /// `[0, 100]`; high when power is evenly spread.
    pub stability: f64,
    /// Player reputation weighted by faction share, in `[-100, 100]`.
    pub player_influence: f64,
    /// Faction with the largest share.
    pub dominant_faction: Option<String>,
}

impl Default for PoliticalInfluence {
    fn default() -> Self {
        Self {
            shares: BTreeMap::new(),
            stability: 100.0,
            player_influence: 0.0,
            dominant_faction: None,
        }
    }
}

fn clamped_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(clamp_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialized_power_is_clamped() {
        // Arrange
        let json = r#"[
            {"id": "iron_crown", "name": "Iron Crown", "power_level": 150.0},
            {"id": "ash_guild", "name": "Ash Guild", "power_level": -20.0},
            {"id": "ferrymen", "name": "Ferrymen"}
        ]"#;

        // Act
        let factions: Vec<Faction> = serde_json::from_str(json).unwrap();

        // Assert
        for (faction, expected) in factions.iter().zip([100.0, 0.0, 0.0]) {
            assert!((faction.power_level - expected).abs() < 1e-9, "{}", faction.id);
        }
    }

    #[test]
    fn test_labels_by_threshold() {
        assert_eq!(RelationshipLabel::from_score(75), RelationshipLabel::Allied);
        assert_eq!(RelationshipLabel::from_score(25), RelationshipLabel::Friendly);
        assert_eq!(RelationshipLabel::from_score(-25), RelationshipLabel::Neutral);
        assert_eq!(RelationshipLabel::from_score(-75), RelationshipLabel::Rival);
        assert_eq!(RelationshipLabel::from_score(-90), RelationshipLabel::Hostile);
        assert_eq!(RelationshipLabel::from_score(-91), RelationshipLabel::AtWar);
    }

    #[test]
    fn test_power_shift_from_description() {
        assert_eq!(
            PowerShift::from_description("guild", "The guild is WEAKENED by the strike"),
            Some(PowerShift::Weaken {
                faction_id: "guild".to_owned()
            })
        );
        assert_eq!(
            PowerShift::from_description("guild", "Guild strengthened its hold").map(|s| s.delta()),
            Some(POWER_SHIFT_AMOUNT)
        );
        assert_eq!(PowerShift::from_description("guild", "Nothing changes"), None);
    }

    #[test]
    fn test_edge_history_is_capped() {
        let mut edge = FactionRelationship::neutral("crown");
        for turn in 0..30 {
            edge = edge.with_delta(-7, "border raid", turn);
        }
        assert_eq!(edge.history.len(), RELATIONSHIP_HISTORY_CAP);
        assert_eq!(edge.score, -100);
        assert_eq!(edge.label, RelationshipLabel::AtWar);
    }
}
