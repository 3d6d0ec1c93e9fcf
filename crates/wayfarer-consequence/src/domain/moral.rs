//! The nine-point moral alignment compass.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::time::TurnNumber;
use wayfarer_world_state::domain::moral::MoralTag;

/// Law/chaos by good/evil.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Honourable and kind.
    LawfulGood,
    /// Kind without regard for rules.
    NeutralGood,
    /// Kind and defiant.
    ChaoticGood,
    /// Bound by rules above all.
    LawfulNeutral,
    /// Uncommitted.
    #[default]
    TrueNeutral,
    /// Free and self-directed.
    ChaoticNeutral,
    /// Cruel within a code.
    LawfulEvil,
    /// Selfish without limit.
    NeutralEvil,
    /// Cruel and lawless.
    ChaoticEvil,
}

impl Alignment {
    /// `(law, good)` grid position, each in `-1..=1`. Lawful and good are
    /// positive.
    #[must_use]
    pub fn position(self) -> (i8, i8) {
        match self {
            Self::LawfulGood => (1, 1),
            Self::NeutralGood => (0, 1),
            Self::ChaoticGood => (-1, 1),
            Self::LawfulNeutral => (1, 0),
            Self::TrueNeutral => (0, 0),
            Self::ChaoticNeutral => (-1, 0),
            Self::LawfulEvil => (1, -1),
            Self::NeutralEvil => (0, -1),
            Self::ChaoticEvil => (-1, -1),
        }
    }

    fn from_position(law: i8, good: i8) -> Self {
        match (law.clamp(-1, 1), good.clamp(-1, 1)) {
            (1, 1) => Self::LawfulGood,
            (0, 1) => Self::NeutralGood,
            (-1, 1) => Self::ChaoticGood,
            (1, 0) => Self::LawfulNeutral,
            (-1, 0) => Self::ChaoticNeutral,
            (1, -1) => Self::LawfulEvil,
            (0, -1) => Self::NeutralEvil,
            (-1, -1) => Self::ChaoticEvil,
            _ => Self::TrueNeutral,
        }
    }

    /// One step toward good along the good/evil axis; good stays put.
    #[must_use]
    pub fn toward_good(self) -> Self {
        let (law, good) = self.position();
        Self::from_position(law, good + 1)
    }

    /// One step toward evil along the good/evil axis; evil stays put.
    #[must_use]
    pub fn toward_evil(self) -> Self {
        let (law, good) = self.position();
        Self::from_position(law, good - 1)
    }

    /// Whether `other` is this point or one of its grid neighbours.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        let (a_law, a_good) = self.position();
        let (b_law, b_good) = other.position();
        (a_law - b_law).abs() <= 1 && (a_good - b_good).abs() <= 1
    }
}

/// One entry in the moral history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoralEvent {
    /// Turn of the choice.
    pub turn: TurnNumber,
    /// Choice that caused it.
    pub choice_id: Uuid,
    /// Moral tag of the choice.
    pub tag: MoralTag,
    /// Scaled shift toward good (+) or evil (-).
    pub shift: f64,
    /// Alignment before.
    pub from: Alignment,
    /// Alignment after.
    pub to: Alignment,
}

impl MoralEvent {
    /// Whether the alignment moved.
    #[must_use]
    pub fn changed_alignment(&self) -> bool {
        self.from != self.to
    }
}

/// The player's alignment trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoralProfile {
    /// Current alignment.
    pub alignment: Alignment,
    /// Every moral event, oldest first; only ever appended to.
    pub history: Vec<MoralEvent>,
    /// `[0, 100]`; falls with frequent alignment changes.
    pub consistency: f64,
    /// Accumulated shift not yet turned into an alignment step.
    pub pressure: f64,
}

impl Default for MoralProfile {
    fn default() -> Self {
        Self {
            alignment: Alignment::TrueNeutral,
            history: Vec::new(),
            consistency: 100.0,
            pressure: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Alignment; 9] = [
        Alignment::LawfulGood,
        Alignment::NeutralGood,
        Alignment::ChaoticGood,
        Alignment::LawfulNeutral,
        Alignment::TrueNeutral,
        Alignment::ChaoticNeutral,
        Alignment::LawfulEvil,
        Alignment::NeutralEvil,
        Alignment::ChaoticEvil,
    ];

    #[test]
    fn test_steps_only_reach_adjacent_points() {
        for alignment in ALL {
            assert!(alignment.is_adjacent(alignment.toward_good()));
            assert!(alignment.is_adjacent(alignment.toward_evil()));
        }
    }

    #[test]
    fn test_steps_keep_law_axis() {
        assert_eq!(Alignment::ChaoticEvil.toward_good(), Alignment::ChaoticNeutral);
        assert_eq!(Alignment::ChaoticNeutral.toward_good(), Alignment::ChaoticGood);
        assert_eq!(Alignment::LawfulGood.toward_good(), Alignment::LawfulGood);
        assert_eq!(Alignment::LawfulNeutral.toward_evil(), Alignment::LawfulEvil);
    }

    #[test]
    fn test_corners_are_not_adjacent() {
        assert!(!Alignment::LawfulGood.is_adjacent(Alignment::ChaoticEvil));
        assert!(!Alignment::NeutralGood.is_adjacent(Alignment::NeutralEvil));
    }
}
