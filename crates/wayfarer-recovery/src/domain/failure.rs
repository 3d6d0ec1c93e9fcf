//! Failure taxonomy.

use serde::{Deserialize, Serialize};
use wayfarer_core::time::{TurnNumber, turns_elapsed};
use wayfarer_world_state::domain::context::{ActionContext, CombatResult};

const HOSTILITY_KEYWORDS: [&str; 7] = [
    "hostile", "angry", "furious", "refuse", "offended", "insulted", "enraged",
];

/// What kind of failure happened. Variants are listed in classification
/// priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Lost a fight.
    CombatDefeat,
    /// A quest objective failed.
    QuestFailure,
    /// A tracked resource ran out.
    ResourceDepletion,
    /// An NPC turned hostile.
    SocialFailure,
    /// Got lost.
    ExplorationFailure,
}

impl FailureCategory {
    /// Classifies the structured outcome signals of an action, first match
    /// wins. A combat defeat always wins over everything else.
    #[must_use]
    pub fn classify(context: &ActionContext) -> Option<Self> {
        let contains = |text: &Option<String>, needle: &str| {
            text.as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle))
        };
        if context.combat_result == Some(CombatResult::Defeat) {
            Some(Self::CombatDefeat)
        } else if contains(&context.quest_outcome, "fail") {
            Some(Self::QuestFailure)
        } else if context.lowest_resource_level().is_some_and(|level| level <= 0) {
            Some(Self::ResourceDepletion)
        } else if HOSTILITY_KEYWORDS
            .iter()
            .any(|k| contains(&context.social_outcome, k))
        {
            Some(Self::SocialFailure)
        } else if contains(&context.exploration_outcome, "lost") {
            Some(Self::ExplorationFailure)
        } else {
            None
        }
    }

    /// Severity a failure of this kind carries by default.
    #[must_use]
    pub fn default_severity(self) -> FailureSeverity {
        match self {
            Self::CombatDefeat => FailureSeverity::Major,
            Self::QuestFailure | Self::ResourceDepletion => FailureSeverity::Moderate,
            Self::SocialFailure | Self::ExplorationFailure => FailureSeverity::Minor,
        }
    }

    /// What typically follows a failure of this kind.
    #[must_use]
    pub fn default_consequences(self) -> Vec<String> {
        let lines: &[&str] = match self {
            Self::CombatDefeat => &["lost health", "dropped loot", "enemies emboldened"],
            Self::QuestFailure => &["quest giver disappointed", "reward forfeited"],
            Self::ResourceDepletion => &["cannot craft or heal", "forced to improvise"],
            Self::SocialFailure => &["relationship damaged", "rumours spread"],
            Self::ExplorationFailure => &["time lost", "supplies consumed"],
        };
        lines.iter().map(|l| (*l).to_owned()).collect()
    }
}

/// How bad a failure is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureSeverity {
    /// A setback.
    Minor,
    /// A real loss.
    Moderate,
    /// A serious blow.
    Major,
}

/// A classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureType {
    /// Kind of failure.
    pub category: FailureCategory,
    /// Severity.
    pub severity: FailureSeverity,
    /// What the player tried and what happened.
    pub description: String,
    /// What typically follows.
    pub default_consequences: Vec<String>,
    /// Turn the failure happened on.
    #[serde(default)]
    pub turn: TurnNumber,
}

impl FailureType {
    /// A failure of `category` with default severity and consequences.
    #[must_use]
    pub fn new(category: FailureCategory, description: impl Into<String>) -> Self {
        Self {
            category,
            severity: category.default_severity(),
            description: description.into(),
            default_consequences: category.default_consequences(),
            turn: 0,
        }
    }

    /// Stamps the turn the failure happened on.
    #[must_use]
    pub fn at_turn(mut self, turn: TurnNumber) -> Self {
        self.turn = turn;
        self
    }

    /// Turns since the failure, as seen from `now`.
    #[must_use]
    pub fn age(&self, now: TurnNumber) -> u32 {
        turns_elapsed(self.turn, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combat_defeat_beats_quest_failure() {
        let context = ActionContext {
            combat_result: Some(CombatResult::Defeat),
            quest_outcome: Some("The escort failed".to_owned()),
            exploration_outcome: Some("lost in the fog".to_owned()),
            ..ActionContext::at("Bridge")
        };
        assert_eq!(
            FailureCategory::classify(&context),
            Some(FailureCategory::CombatDefeat)
        );
    }

    #[test]
    fn test_classification_priority_below_combat() {
        let mut context = ActionContext {
            social_outcome: Some("The duke is FURIOUS".to_owned()),
            exploration_outcome: Some("You got lost".to_owned()),
            ..ActionContext::at("Court")
        };
        assert_eq!(
            FailureCategory::classify(&context),
            Some(FailureCategory::SocialFailure)
        );

        context.resource_levels.insert("torches".to_owned(), 0);
        assert_eq!(
            FailureCategory::classify(&context),
            Some(FailureCategory::ResourceDepletion)
        );

        context.quest_outcome = Some("Quest failed".to_owned());
        assert_eq!(
            FailureCategory::classify(&context),
            Some(FailureCategory::QuestFailure)
        );
    }

    #[test]
    fn test_failure_age_counts_from_its_turn() {
        let failure = FailureType::new(FailureCategory::CombatDefeat, "ambushed").at_turn(5);
        assert_eq!(failure.turn, 5);
        assert_eq!(failure.age(8), 3);
        assert_eq!(failure.age(2), 0);
    }

    #[test]
    fn test_victory_and_retreat_are_not_failures() {
        for result in [CombatResult::Victory, CombatResult::Retreat] {
            let context = ActionContext {
                combat_result: Some(result),
                ..ActionContext::at("Field")
            };
            assert_eq!(FailureCategory::classify(&context), None);
        }
    }
}
