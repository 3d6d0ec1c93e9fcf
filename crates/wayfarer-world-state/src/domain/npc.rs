//! Non-player characters the story keeps track of.

use serde::{Deserialize, Serialize};
use wayfarer_core::bounds::{push_capped, shift_relation};
use wayfarer_core::time::TurnNumber;

/// Number of interactions retained per NPC.
pub const INTERACTION_HISTORY_CAP: usize = 10;

/// One recorded change to an NPC's opinion of the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Turn on which it happened.
    pub turn: TurnNumber,
    /// Signed relationship change.
    pub delta: i32,
    /// Why the relationship moved.
    pub reason: String,
}

/// An NPC with an opinion of the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackedNpc {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Opinion of the player in `[-100, 100]`.
    pub relationship: i32,
    /// Whether the NPC is alive.
    pub alive: bool,
    /// What the NPC currently wants.
    pub goals: Vec<String>,
    /// Most recent interactions, oldest first.
    pub interactions: Vec<Interaction>,
}

impl Default for TrackedNpc {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            relationship: 0,
            alive: true,
            goals: Vec::new(),
            interactions: Vec::new(),
        }
    }
}

impl TrackedNpc {
    /// A living NPC with neutral opinion, used when an effect references an
    /// NPC the snapshot does not track yet.
    #[must_use]
    pub fn stranger(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// Applies a relationship delta, clamping the score and recording the
    /// interaction in the capped history.
    #[must_use]
    pub fn with_relationship_delta(mut self, delta: i32, reason: &str, turn: TurnNumber) -> Self {
        self.relationship = shift_relation(self.relationship, delta);
        self.interactions = push_capped(
            &self.interactions,
            Interaction {
                turn,
                delta,
                reason: reason.to_owned(),
            },
            INTERACTION_HISTORY_CAP,
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_extreme_deltas_stay_clamped() {
        let mut npc = TrackedNpc::stranger("mira");
        for turn in 0..50 {
            npc = npc.with_relationship_delta(i32::MAX, "gift", turn);
            assert!(npc.relationship <= 100);
        }
        for turn in 50..100 {
            npc = npc.with_relationship_delta(-1000, "insult", turn);
            assert!(npc.relationship >= -100);
        }
        assert_eq!(npc.relationship, -100);
        assert_eq!(npc.interactions.len(), INTERACTION_HISTORY_CAP);
        assert_eq!(npc.interactions.last().unwrap().turn, 99);
    }
}
