//! Quest lifecycle and branch selection.

use tracing::info;
use uuid::Uuid;
use wayfarer_core::bounds::clamp_score;
use wayfarer_core::error::DomainError;
use wayfarer_core::time::{Clock, TurnNumber, turns_elapsed};
use wayfarer_world_state::domain::moral::MoralTag;
use wayfarer_world_state::domain::quest::{
    Quest, QuestBranch, QuestChoice, QuestFailureCondition, QuestStatus,
};
use wayfarer_world_state::domain::snapshot::StoryState;

use crate::application::conditions::{evaluate_branch_condition, validate_quest_prerequisites};
use crate::domain::failure::{QuestFailureKind, QuestFailureRecord};

fn find_quest<'a>(state: &'a StoryState, quest_id: &str) -> Result<&'a Quest, DomainError> {
    state
        .quest(quest_id)
        .ok_or_else(|| DomainError::UnknownQuest(quest_id.to_owned()))
}

fn excludes(a: &QuestBranch, b: &QuestBranch) -> bool {
    a.exclusive_with.contains(&b.id) || b.exclusive_with.contains(&a.id)
}

fn branch_window_open(branch: &QuestBranch, quest: &Quest, now: TurnNumber) -> bool {
    match (branch.time_limit, quest.branch_clock_anchor()) {
        (Some(limit), Some(anchor)) => turns_elapsed(anchor, now) <= limit,
        _ => true,
    }
}

/// Branches the player could commit to right now.
///
/// Only active quests offer branches. A branch is offered when all its
/// conditions hold, it does not exclude (and is not excluded by) the active
/// branch, and its time window has not closed.
#[must_use]
pub fn get_available_quest_branches<'a>(quest: &'a Quest, state: &StoryState) -> Vec<&'a QuestBranch> {
    if !quest.is_active() {
        return Vec::new();
    }
    let active = quest.active_branch.as_deref().and_then(|id| quest.branch(id));
    quest
        .branches
        .iter()
        .filter(|b| active.is_none_or(|a| a.id != b.id && !excludes(a, b)))
        .filter(|b| branch_window_open(b, quest, state.turn))
        .filter(|b| {
            b.conditions
                .iter()
                .all(|c| evaluate_branch_condition(c, quest, state))
        })
        .collect()
}

/// How hard committing to a branch is, in `[0, 100]`.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn branch_difficulty(branch: &QuestBranch, moral_tag: MoralTag) -> u8 {
    let mut score = 20.0;
    score += branch.conditions.len() as f64 * 10.0;
    score += branch.exclusive_with.len() as f64 * 10.0;
    if branch.time_limit.is_some() {
        score += 20.0;
    }
    if moral_tag == MoralTag::Complex {
        score += 15.0;
    }
    clamp_score(score).round() as u8
}

/// Commits the player to a branch, replacing the quest's objectives and
/// rewards with the branch's and appending the choice to its history.
///
/// # Errors
///
/// Returns `DomainError::UnknownQuest` or `DomainError::UnknownBranch` for
/// unknown identifiers and `DomainError::Validation` if the branch is not
/// currently available.
pub fn select_quest_branch(
    quest_id: &str,
    branch_id: &str,
    state: &StoryState,
    clock: &dyn Clock,
) -> Result<Quest, DomainError> {
    let quest = find_quest(state, quest_id)?;
    let branch = quest.branch(branch_id).ok_or_else(|| DomainError::UnknownBranch {
        quest_id: quest_id.to_owned(),
        branch_id: branch_id.to_owned(),
    })?;
    if !get_available_quest_branches(quest, state)
        .iter()
        .any(|b| b.id == branch_id)
    {
        return Err(DomainError::Validation(format!(
            "branch {branch_id} of quest {quest_id} is not available"
        )));
    }

    let moral_tag = branch
        .moral_tag
        .unwrap_or_else(|| MoralTag::infer(&format!("{} {}", branch.name, branch.description)));
    let choice = QuestChoice {
        id: Uuid::new_v4(),
        quest_id: quest_id.to_owned(),
        branch_id: branch_id.to_owned(),
        turn: state.turn,
        moral_tag,
        difficulty: branch_difficulty(branch, moral_tag),
        made_at: clock.now(),
    };

    let mut next = quest.clone();
    next.objectives.clone_from(&branch.objectives);
    next.rewards = branch.rewards.clone();
    next.active_branch = Some(branch_id.to_owned());
    next.choice_history.push(choice);
    info!(quest_id, branch_id, turn = state.turn, ?moral_tag, "quest branch selected");
    Ok(next)
}

/// The first failure condition an active quest has met, if any.
#[must_use]
pub fn check_quest_failure_conditions(quest: &Quest, state: &StoryState) -> Option<QuestFailureKind> {
    if !quest.is_active() {
        return None;
    }
    quest.failure_conditions.iter().find_map(|condition| match condition {
        QuestFailureCondition::TimeLimit { turns } => {
            let elapsed = turns_elapsed(quest.started_turn?, state.turn);
            (elapsed > *turns).then_some(QuestFailureKind::TimeLimitExceeded {
                limit: *turns,
                elapsed,
            })
        }
        QuestFailureCondition::CharacterDeath => {
            (!state.character.is_alive()).then_some(QuestFailureKind::CharacterDeath)
        }
        QuestFailureCondition::ItemLost { item_id } => (state.item_quantity(item_id) == 0)
            .then(|| QuestFailureKind::RequiredItemLost {
                item_id: item_id.clone(),
            }),
        QuestFailureCondition::RelationshipBelow { npc_id, threshold } => {
            let relationship = state.npc_or_stranger(npc_id).relationship;
            (relationship < *threshold).then(|| QuestFailureKind::RelationshipCollapsed {
                npc_id: npc_id.clone(),
                relationship,
            })
        }
        QuestFailureCondition::FactionBelow {
            faction_id,
            threshold,
        } => {
            let reputation = state.standing(faction_id).reputation;
            (reputation < *threshold).then(|| QuestFailureKind::FactionStandingCollapsed {
                faction_id: faction_id.clone(),
                reputation,
            })
        }
        QuestFailureCondition::NpcDeath { npc_id } => state
            .npc(npc_id)
            .is_some_and(|npc| !npc.alive)
            .then(|| QuestFailureKind::NpcDied {
                npc_id: npc_id.clone(),
            }),
    })
}

/// Writes the failure record, with recovery options for the failure kind.
#[must_use]
pub fn create_quest_failure_record(
    quest: &Quest,
    kind: QuestFailureKind,
    turn: TurnNumber,
    clock: &dyn Clock,
) -> QuestFailureRecord {
    QuestFailureRecord {
        id: Uuid::new_v4(),
        quest_id: quest.id.clone(),
        description: format!("{}: {}", quest.title, kind.describe()),
        recovery_options: kind.recovery_options(),
        kind,
        turn,
        recorded_at: clock.now(),
    }
}

/// Marks a quest failed.
#[must_use]
pub fn fail_quest(quest: &Quest) -> Quest {
    info!(quest_id = %quest.id, "quest failed");
    Quest {
        status: QuestStatus::Failed,
        ..quest.clone()
    }
}

/// `not_started -> active`, once every mandatory prerequisite holds.
///
/// # Errors
///
/// Returns `DomainError::UnknownQuest` for an unknown quest and
/// `DomainError::Validation` if the quest has already started or a
/// prerequisite blocks it.
pub fn start_quest(quest_id: &str, state: &StoryState) -> Result<Quest, DomainError> {
    let quest = find_quest(state, quest_id)?;
    if quest.status != QuestStatus::NotStarted {
        return Err(DomainError::Validation(format!(
            "quest {quest_id} cannot start from {:?}",
            quest.status
        )));
    }
    let check = validate_quest_prerequisites(quest, state);
    if let Some(blocking) = check.blocking {
        return Err(DomainError::Validation(format!(
            "quest {quest_id} is blocked by {:?}",
            blocking.condition
        )));
    }
    info!(quest_id, turn = state.turn, "quest started");
    Ok(Quest {
        status: QuestStatus::Active,
        started_turn: Some(state.turn),
        ..quest.clone()
    })
}

/// `active -> completed`.
///
/// # Errors
///
/// Returns `DomainError::UnknownQuest` for an unknown quest and
/// `DomainError::Validation` if the quest is not active.
pub fn complete_quest(quest_id: &str, state: &StoryState) -> Result<Quest, DomainError> {
    let quest = find_quest(state, quest_id)?;
    if !quest.is_active() {
        return Err(DomainError::Validation(format!(
            "quest {quest_id} is not active"
        )));
    }
    info!(quest_id, turn = state.turn, "quest completed");
    Ok(Quest {
        status: QuestStatus::Completed,
        ..quest.clone()
    })
}

/// `failed -> active`, after the player has recovered. The quest clock
/// restarts at the current turn.
///
/// # Errors
///
/// Returns `DomainError::UnknownQuest` for an unknown quest and
/// `DomainError::Validation` if the quest has not failed.
pub fn reactivate_quest(quest_id: &str, state: &StoryState) -> Result<Quest, DomainError> {
    let quest = find_quest(state, quest_id)?;
    if quest.status != QuestStatus::Failed {
        return Err(DomainError::Validation(format!(
            "quest {quest_id} has not failed"
        )));
    }
    info!(quest_id, turn = state.turn, "quest reactivated");
    Ok(Quest {
        status: QuestStatus::Active,
        started_turn: Some(state.turn),
        ..quest.clone()
    })
}
