//! The player's reputation with each faction.

use serde::{Deserialize, Serialize};
use wayfarer_core::bounds::{push_capped, shift_relation};
use wayfarer_core::time::TurnNumber;

/// Number of standing changes retained per faction.
pub const STANDING_HISTORY_CAP: usize = 20;

/// Discrete label for a reputation score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingLabel {
    /// `reputation <= -61`.
    Hostile,
    /// `-60..=-21`.
    Unfriendly,
    /// `-20..=19`.
    #[default]
    Neutral,
    /// `20..=59`.
    Friendly,
    /// `60..=89`.
    Allied,
    /// `>= 90`.
    Revered,
}

impl StandingLabel {
    /// Maps a reputation score to its label.
    #[must_use]
    pub fn from_reputation(reputation: i32) -> Self {
        match reputation {
            r if r >= 90 => Self::Revered,
            r if r >= 60 => Self::Allied,
            r if r >= 20 => Self::Friendly,
            r if r >= -20 => Self::Neutral,
            r if r >= -60 => Self::Unfriendly,
            _ => Self::Hostile,
        }
    }
}

/// One recorded reputation change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingChange {
    /// Turn on which it happened.
    pub turn: TurnNumber,
    /// Signed change that was requested.
    pub delta: i32,
    /// Score after clamping.
    pub resulting: i32,
    /// Why the standing moved.
    pub reason: String,
}

/// The player's reputation with one faction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionStanding {
    /// Faction identifier.
    pub faction_id: String,
    /// Reputation in `[-100, 100]`.
    pub reputation: i32,
    /// Label derived from `reputation`.
    pub label: StandingLabel,
    /// Most recent changes, oldest first.
    pub history: Vec<StandingChange>,
}

impl FactionStanding {
    /// A neutral standing with no history.
    #[must_use]
    pub fn neutral(faction_id: impl Into<String>) -> Self {
        Self {
            faction_id: faction_id.into(),
            ..Self::default()
        }
    }

    /// A standing at the given reputation.
    #[must_use]
    pub fn at(faction_id: impl Into<String>, reputation: i32) -> Self {
        let reputation = shift_relation(reputation, 0);
        Self {
            faction_id: faction_id.into(),
            reputation,
            label: StandingLabel::from_reputation(reputation),
            history: Vec::new(),
        }
    }

    /// Applies a reputation delta: clamps, relabels and appends exactly one
    /// history entry.
    #[must_use]
    pub fn with_delta(mut self, delta: i32, reason: &str, turn: TurnNumber) -> Self {
        self.reputation = shift_relation(self.reputation, delta);
        self.label = StandingLabel::from_reputation(self.reputation);
        self.history = push_capped(
            &self.history,
            StandingChange {
                turn,
                delta,
                resulting: self.reputation,
                reason: reason.to_owned(),
            },
            STANDING_HISTORY_CAP,
        );
        self
    }
}
