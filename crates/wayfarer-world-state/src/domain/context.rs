//! Structured context accompanying a player action.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Outcome of a combat encounter as reported by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatResult {
    /// The player won the encounter.
    Victory,
    /// The player was beaten.
    Defeat,
    /// The player disengaged.
    Retreat,
}

/// Structured signals describing the action the player just took.
///
/// Free-text outcome fields come straight from the narrative generator and
/// are interpreted by the failure classifier; everything else is typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionContext {
    /// Where the action took place. Empty means "unchanged".
    pub location: String,
    /// Result of combat, if the action involved combat.
    pub combat_result: Option<CombatResult>,
    /// Generator text describing a quest outcome.
    pub quest_outcome: Option<String>,
    /// Generator text describing a social outcome.
    pub social_outcome: Option<String>,
    /// Generator text describing an exploration outcome.
    pub exploration_outcome: Option<String>,
    /// Named resource levels reported alongside the action.
    pub resource_levels: BTreeMap<String, i64>,
    /// Hostiles involved in the action.
    pub enemy_count: u32,
    /// Allies fighting alongside the player (the player not included).
    pub ally_count: u32,
    /// Whether the generator flagged the action as time-critical.
    pub time_pressure: bool,
}

impl ActionContext {
    /// Context for an action at `location` with no other signals.
    #[must_use]
    pub fn at(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    /// Whether the player faces more enemies than they bring allies.
    #[must_use]
    pub fn is_outnumbered(&self) -> bool {
        self.enemy_count > self.ally_count + 1
    }

    /// Lowest reported resource level, if any were reported.
    #[must_use]
    pub fn lowest_resource_level(&self) -> Option<i64> {
        self.resource_levels.values().copied().min()
    }
}
