//! The quest condition language.

use tracing::debug;
use wayfarer_core::time::turns_elapsed;
use wayfarer_world_state::domain::quest::{Quest, QuestCondition, QuestStatus};
use wayfarer_world_state::domain::snapshot::StoryState;

use crate::domain::prerequisite::PrerequisiteCheck;

/// Evaluates one condition against the story state.
///
/// `quest` is the quest the condition belongs to; time limits are measured
/// from its start turn, and its own choices count for `choice_made` even
/// when the snapshot holds an older copy of it.
#[must_use]
pub fn evaluate_branch_condition(
    condition: &QuestCondition,
    quest: &Quest,
    state: &StoryState,
) -> bool {
    match condition {
        QuestCondition::QuestCompletion { quest_id } => state
            .quest(quest_id)
            .is_some_and(|q| q.status == QuestStatus::Completed),
        QuestCondition::LevelRequirement { min_level } => state.character.level >= *min_level,
        QuestCondition::SkillRequirement { skill, min } => state.character.skill(skill) >= *min,
        QuestCondition::ItemPossession { item_id, quantity } => {
            state.item_quantity(item_id) >= (*quantity).max(1)
        }
        QuestCondition::RelationshipLevel { npc_id, min } => {
            state.npc_or_stranger(npc_id).relationship >= *min
        }
        QuestCondition::FactionStanding { faction_id, min } => {
            state.standing(faction_id).reputation >= *min
        }
        QuestCondition::LocationVisit { location } => state.has_visited(location),
        QuestCondition::ChoiceMade { choice_id } => {
            let chosen = |q: &Quest| q.choice_history.iter().any(|c| &c.branch_id == choice_id);
            chosen(quest) || state.quests.iter().any(chosen)
        }
        QuestCondition::StatCheck { stat, min } => state.character.stat(stat) >= *min,
        QuestCondition::TimeLimit { turns } => quest
            .started_turn
            .is_none_or(|started| turns_elapsed(started, state.turn) <= *turns),
    }
}

/// Checks whether a quest may start. Stops at the first mandatory
/// prerequisite that does not hold.
#[must_use]
pub fn validate_quest_prerequisites(quest: &Quest, state: &StoryState) -> PrerequisiteCheck {
    let mut unmet_optional = Vec::new();
    for prerequisite in &quest.prerequisites {
        if evaluate_branch_condition(&prerequisite.condition, quest, state) {
            continue;
        }
        if prerequisite.optional {
            unmet_optional.push(prerequisite.clone());
            continue;
        }
        debug!(quest_id = %quest.id, condition = ?prerequisite.condition, "prerequisite not met");
        return PrerequisiteCheck {
            met: false,
            blocking: Some(prerequisite.clone()),
            unmet_optional,
        };
    }
    PrerequisiteCheck {
        met: true,
        blocking: None,
        unmet_optional,
    }
}
