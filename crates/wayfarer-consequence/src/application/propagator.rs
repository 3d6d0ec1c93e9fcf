//! Consequence propagator.
//!
//! Records player choices and manifests their typed effects onto the story
//! state. Every effect is traced on its choice as it actually landed, so a
//! reversible consequence can later be undone exactly.

use tracing::{debug, info};
use uuid::Uuid;
use wayfarer_core::bounds::clamp_score;
use wayfarer_core::error::DomainError;
use wayfarer_core::time::{Clock, TurnNumber};
use wayfarer_world_state::domain::context::ActionContext;
use wayfarer_world_state::domain::moral::MoralTag;
use wayfarer_world_state::domain::quest::QuestStatus;
use wayfarer_world_state::domain::snapshot::StoryState;

use crate::domain::choice::{
    ChoiceConsequenceTracking, ChoiceContext, ChoiceInput, ManifestOutcome, PlayerChoice,
};
use crate::domain::effect::{Consequence, ConsequenceEffect};

/// Pressure a choice was made under, from health, stress and urgent quests.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn choice_pressure(state: &StoryState) -> f64 {
    let wounds = (1.0 - state.character.health_ratio()) * 40.0;
    let stress = state.character.stress_score() * 0.3;
    let urgency = state.urgent_quest_count() as f64 * 10.0;
    clamp_score(wounds + stress + urgency)
}

/// Difficulty of a decision from its pressure and how many options were
/// passed over.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn choice_difficulty(pressure: f64, alternatives: usize) -> u8 {
    let breadth = alternatives.min(4) as f64 * 10.0;
    clamp_score(pressure * 0.6 + breadth).round() as u8
}

/// Records a choice. The story state is read, never changed.
#[must_use]
pub fn record_player_choice(
    input: &ChoiceInput,
    context: &ActionContext,
    turn: TurnNumber,
    state: &StoryState,
    clock: &dyn Clock,
) -> PlayerChoice {
    let moral_tag = input
        .moral_tag
        .unwrap_or_else(|| MoralTag::infer(&format!("{} {}", input.text, input.description)));
    let pressure = choice_pressure(state);
    let difficulty = choice_difficulty(pressure, input.alternatives.len());
    let location = if context.location.is_empty() {
        state.location.as_str()
    } else {
        context.location.as_str()
    };

    let choice = PlayerChoice {
        id: Uuid::new_v4(),
        text: input.text.clone(),
        description: input.description.clone(),
        alternatives: input.alternatives.clone(),
        context: ChoiceContext::capture(location, state),
        moral_tag,
        pressure,
        difficulty,
        turn,
        made_at: clock.now(),
        consequences: Vec::new(),
    };
    info!(
        choice_id = %choice.id,
        turn,
        moral_tag = ?choice.moral_tag,
        difficulty,
        "player choice recorded"
    );
    choice
}

/// Applies every effect of `consequence` and traces it on `choice`.
#[must_use]
pub fn manifest_consequence(
    consequence: &Consequence,
    choice: &PlayerChoice,
    turn: TurnNumber,
    state: &StoryState,
) -> ManifestOutcome {
    let reason = if consequence.description.is_empty() {
        consequence.id.as_str()
    } else {
        consequence.description.as_str()
    };

    let mut next = state.clone();
    let mut applied_effects = Vec::new();
    let mut descriptions = Vec::new();
    for effect in &consequence.effects {
        let (applied, landed, description) = apply_effect(next, effect, reason, turn);
        next = applied;
        applied_effects.extend(landed);
        descriptions.push(description);
    }

    let mut traced = choice.clone();
    traced.consequences.push(ChoiceConsequenceTracking {
        consequence_id: consequence.id.clone(),
        description: consequence.description.clone(),
        severity: consequence.severity,
        category: consequence.category,
        awareness: consequence.awareness,
        reversible: consequence.reversible,
        applied_effects,
        manifested_turn: turn,
        reverted: false,
    });

    info!(
        choice_id = %choice.id,
        consequence_id = %consequence.id,
        effects = consequence.effects.len(),
        turn,
        "consequence manifested"
    );
    ManifestOutcome {
        state: next,
        choice: traced,
        descriptions,
    }
}

/// Undoes the numeric, fact and item effects of a manifested consequence.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the consequence never manifested on
/// this choice, is irreversible, or has already been reverted.
pub fn revert_consequence(
    choice: &PlayerChoice,
    consequence_id: &str,
    turn: TurnNumber,
    state: &StoryState,
) -> Result<ManifestOutcome, DomainError> {
    let index = choice
        .consequences
        .iter()
        .rposition(|c| c.consequence_id == consequence_id)
        .ok_or_else(|| {
            DomainError::Validation(format!(
                "consequence {consequence_id} has not manifested on choice {}",
                choice.id
            ))
        })?;
    let tracking = &choice.consequences[index];
    if !tracking.reversible {
        return Err(DomainError::Validation(format!(
            "consequence {consequence_id} is irreversible"
        )));
    }
    if tracking.reverted {
        return Err(DomainError::Validation(format!(
            "consequence {consequence_id} has already been reverted"
        )));
    }

    let reason = format!("reverted {consequence_id}");
    let mut next = state.clone();
    let mut descriptions = Vec::new();
    for inverse in tracking.applied_effects.iter().rev().filter_map(ConsequenceEffect::inverse) {
        let (applied, _, description) = apply_effect(next, &inverse, &reason, turn);
        next = applied;
        descriptions.push(description);
    }

    let mut traced = choice.clone();
    traced.consequences[index].reverted = true;
    info!(choice_id = %choice.id, consequence_id, turn, "consequence reverted");
    Ok(ManifestOutcome {
        state: next,
        choice: traced,
        descriptions,
    })
}

fn saturating_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Applies one effect, returning the new state, the effect as it actually
/// landed (if it changed anything) and a description.
fn apply_effect(
    state: StoryState,
    effect: &ConsequenceEffect,
    reason: &str,
    turn: TurnNumber,
) -> (StoryState, Option<ConsequenceEffect>, String) {
    debug!(?effect, turn, "applying consequence effect");
    match effect {
        ConsequenceEffect::StatDelta { stat, delta } => {
            let before = state.character.stat_value(stat);
            let character = state.character.clone().with_stat_delta(stat, *delta);
            let landed = saturating_i32(character.stat_value(stat) - before);
            let description = format!("{stat} {landed:+}");
            (
                StoryState { character, ..state },
                (landed != 0).then(|| ConsequenceEffect::StatDelta {
                    stat: stat.clone(),
                    delta: landed,
                }),
                description,
            )
        }
        ConsequenceEffect::RelationshipDelta { npc_id, delta } => {
            let npc = state.npc_or_stranger(npc_id);
            let before = npc.relationship;
            let npc = npc.with_relationship_delta(*delta, reason, turn);
            let landed = npc.relationship - before;
            let description = format!("{}'s opinion {before} -> {}", npc.name, npc.relationship);
            (
                state.with_npc(npc),
                (landed != 0).then(|| ConsequenceEffect::RelationshipDelta {
                    npc_id: npc_id.clone(),
                    delta: landed,
                }),
                description,
            )
        }
        ConsequenceEffect::FactionDelta { faction_id, delta } => {
            let standing = state.standing(faction_id);
            let before = standing.reputation;
            let standing = standing.with_delta(*delta, reason, turn);
            let landed = standing.reputation - before;
            let description = format!(
                "Reputation with {faction_id} {before} -> {} ({:?})",
                standing.reputation, standing.label
            );
            (
                state.with_standing(standing),
                (landed != 0).then(|| ConsequenceEffect::FactionDelta {
                    faction_id: faction_id.clone(),
                    delta: landed,
                }),
                description,
            )
        }
        ConsequenceEffect::WorldFactAdded { fact } => {
            if state.has_fact(fact) {
                return (state, None, format!("Already known: {fact}"));
            }
            let mut next = state;
            next.world_facts.push(fact.clone());
            (next, Some(effect.clone()), format!("World fact added: {fact}"))
        }
        ConsequenceEffect::WorldFactRemoved { fact } => {
            if !state.has_fact(fact) {
                return (state, None, format!("Not a known fact: {fact}"));
            }
            let mut next = state;
            next.world_facts.retain(|f| f != fact);
            (next, Some(effect.clone()), format!("World fact removed: {fact}"))
        }
        ConsequenceEffect::QuestLock { quest_id } => match state.quest(quest_id).cloned() {
            Some(mut quest) => {
                quest.status = QuestStatus::Failed;
                let description = format!("Quest locked: {}", quest.title);
                (state.with_quest(quest), Some(effect.clone()), description)
            }
            None => (state, None, format!("No such quest to lock: {quest_id}")),
        },
        ConsequenceEffect::ItemGained {
            item_id,
            name,
            quantity,
        } => (
            state.with_item_added(item_id, name, *quantity),
            (*quantity > 0).then(|| effect.clone()),
            format!("Gained {quantity} x {name}"),
        ),
        ConsequenceEffect::ItemLost { item_id, quantity } => {
            let before = state.item_quantity(item_id);
            let next = state.with_item_removed(item_id, *quantity);
            let lost = before - next.item_quantity(item_id);
            (
                next,
                (lost > 0).then(|| ConsequenceEffect::ItemLost {
                    item_id: item_id.clone(),
                    quantity: lost,
                }),
                format!("Lost {lost} x {item_id}"),
            )
        }
        ConsequenceEffect::LocationChange { location } => (
            state.with_location(location),
            Some(effect.clone()),
            format!("Moved to {location}"),
        ),
        ConsequenceEffect::NpcGoalUpdate { npc_id, goal } => {
            let mut npc = state.npc_or_stranger(npc_id);
            if !npc.goals.contains(goal) {
                npc.goals.push(goal.clone());
            }
            let description = format!("{} now pursues: {goal}", npc.name);
            (state.with_npc(npc), Some(effect.clone()), description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_test_support::fixed_clock;
    use wayfarer_world_state::domain::inventory::InventoryItem;
    use wayfarer_world_state::domain::npc::TrackedNpc;
    use wayfarer_world_state::domain::quest::Quest;
    use wayfarer_world_state::domain::standing::{FactionStanding, StandingLabel};

    fn village() -> StoryState {
        let mut quest = Quest::new("well", "Poisoned Well");
        quest.status = QuestStatus::Active;
        quest.urgent = true;
        let mut state = StoryState {
            location: "Ashford".to_owned(),
            inventory: vec![InventoryItem::new("rope", "Rope", 1)],
            ..StoryState::default()
        }
        .with_quest(quest)
        .with_standing(FactionStanding::at("iron_court", 80));
        state.npcs.push(TrackedNpc {
            relationship: 40,
            ..TrackedNpc::stranger("mira")
        });
        state.character.health = 50;
        state.character.stress = 20;
        state
    }

    fn choose(text: &str, state: &StoryState) -> PlayerChoice {
        let input = ChoiceInput {
            text: text.to_owned(),
            alternatives: vec!["walk away".to_owned(), "negotiate".to_owned()],
            ..ChoiceInput::default()
        };
        record_player_choice(&input, &ActionContext::at("Ashford"), 3, state, &fixed_clock())
    }

    #[test]
    fn test_untagged_choice_with_keyword_fragments_stays_neutral() {
        let choice = choose("Use my skill to slip past in stealth", &village());
        assert_eq!(choice.moral_tag, MoralTag::Neutral);
    }

    #[test]
    fn test_record_choice_infers_tag_and_pressure() {
        let choice = choose("Protect the villagers", &village());
        assert_eq!(choice.moral_tag, MoralTag::Good);
        // 0.5 * 40 + 20 * 0.3 + 10 * 1
        assert!((choice.pressure - 36.0).abs() < 1e-9);
        // 36 * 0.6 + 20 = 41.6
        assert_eq!(choice.difficulty, 42);
        assert_eq!(choice.context.active_quests, vec!["well".to_owned()]);
        assert!(choice.consequences.is_empty());
    }

    #[test]
    fn test_explicit_tag_wins_over_inference() {
        let input = ChoiceInput {
            text: "Kill the wolf to save the child".to_owned(),
            moral_tag: Some(MoralTag::Complex),
            ..ChoiceInput::default()
        };
        let choice = record_player_choice(
            &input,
            &ActionContext::default(),
            1,
            &village(),
            &fixed_clock(),
        );
        assert_eq!(choice.moral_tag, MoralTag::Complex);
        assert_eq!(choice.context.location, "Ashford");
    }

    #[test]
    fn test_zero_consequence_choice_leaves_state_unchanged() {
        let state = village();
        let choice = choose("Wait and watch", &state);
        let outcome = manifest_consequence(&Consequence::new("nothing", Vec::new()), &choice, 3, &state);

        assert_eq!(outcome.state, state);
        assert_eq!(
            serde_json::to_string(&outcome.state).unwrap(),
            serde_json::to_string(&state).unwrap()
        );
        assert_eq!(outcome.choice.consequences.len(), 1);
        assert!(outcome.choice.consequences[0].applied_effects.is_empty());
    }

    #[test]
    fn test_faction_scenario_clamps_and_relabels_with_one_entry() {
        let state = village();
        let choice = choose("Burn the treaty", &state);
        let consequence = Consequence::new(
            "treaty",
            vec![ConsequenceEffect::FactionDelta {
                faction_id: "iron_court".to_owned(),
                delta: -200,
            }],
        );
        let outcome = manifest_consequence(&consequence, &choice, 3, &state);
        let standing = outcome.state.standing("iron_court");

        assert_eq!(standing.reputation, -100);
        assert_eq!(standing.label, StandingLabel::Hostile);
        assert_eq!(standing.history.len(), 1);
        assert_eq!(
            outcome.choice.consequences[0].applied_effects,
            vec![ConsequenceEffect::FactionDelta {
                faction_id: "iron_court".to_owned(),
                delta: -180
            }]
        );
    }

    #[test]
    fn test_repeated_extreme_deltas_stay_in_range() {
        let mut state = village();
        let choice = choose("Keep pushing", &state);
        for round in 0..40 {
            let delta = if round % 2 == 0 { i32::MAX } else { i32::MIN };
            let consequence = Consequence::new(
                format!("swing-{round}"),
                vec![
                    ConsequenceEffect::RelationshipDelta {
                        npc_id: "mira".to_owned(),
                        delta,
                    },
                    ConsequenceEffect::FactionDelta {
                        faction_id: "iron_court".to_owned(),
                        delta,
                    },
                ],
            );
            state = manifest_consequence(&consequence, &choice, round, &state).state;
            let npc = state.npc("mira").unwrap();
            assert!((-100..=100).contains(&npc.relationship));
            assert!((-100..=100).contains(&state.standing("iron_court").reputation));
        }
    }

    #[test]
    fn test_every_effect_kind_lands() {
        let state = village();
        let choice = choose("Sacrifice the bridge", &state);
        let consequence = Consequence::new(
            "bridge",
            vec![
                ConsequenceEffect::StatDelta {
                    stat: "health".to_owned(),
                    delta: -80,
                },
                ConsequenceEffect::RelationshipDelta {
                    npc_id: "oskar".to_owned(),
                    delta: 15,
                },
                ConsequenceEffect::WorldFactAdded {
                    fact: "bridge_burned".to_owned(),
                },
                ConsequenceEffect::QuestLock {
                    quest_id: "well".to_owned(),
                },
                ConsequenceEffect::ItemGained {
                    item_id: "ash".to_owned(),
                    name: "Ash".to_owned(),
                    quantity: 2,
                },
                ConsequenceEffect::ItemLost {
                    item_id: "rope".to_owned(),
                    quantity: 5,
                },
                ConsequenceEffect::LocationChange {
                    location: "Far Bank".to_owned(),
                },
                ConsequenceEffect::NpcGoalUpdate {
                    npc_id: "mira".to_owned(),
                    goal: "rebuild the bridge".to_owned(),
                },
            ],
        );
        let outcome = manifest_consequence(&consequence, &choice, 3, &state);
        let next = &outcome.state;

        assert_eq!(next.character.health, 0);
        assert_eq!(next.npc("oskar").unwrap().relationship, 15);
        assert!(next.has_fact("bridge_burned"));
        assert_eq!(next.quest("well").unwrap().status, QuestStatus::Failed);
        assert_eq!(next.item_quantity("ash"), 2);
        assert_eq!(next.item_quantity("rope"), 0);
        assert_eq!(next.location, "Far Bank");
        assert!(next.has_visited("Ashford"));
        assert_eq!(next.npc("mira").unwrap().goals, vec!["rebuild the bridge".to_owned()]);
        assert_eq!(outcome.descriptions.len(), 8);

        let applied = &outcome.choice.consequences[0].applied_effects;
        assert!(applied.contains(&ConsequenceEffect::StatDelta {
            stat: "health".to_owned(),
            delta: -50
        }));
        assert!(applied.contains(&ConsequenceEffect::ItemLost {
            item_id: "rope".to_owned(),
            quantity: 1
        }));
    }

    #[test]
    fn test_revert_restores_numeric_fact_and_item_effects() {
        let state = village();
        let choice = choose("Steal the ledger", &state);
        let consequence = Consequence::new(
            "ledger",
            vec![
                ConsequenceEffect::RelationshipDelta {
                    npc_id: "mira".to_owned(),
                    delta: -30,
                },
                ConsequenceEffect::WorldFactAdded {
                    fact: "ledger_stolen".to_owned(),
                },
                ConsequenceEffect::ItemGained {
                    item_id: "ledger".to_owned(),
                    name: "Ledger".to_owned(),
                    quantity: 1,
                },
            ],
        );
        let manifested = manifest_consequence(&consequence, &choice, 3, &state);
        let reverted =
            revert_consequence(&manifested.choice, "ledger", 4, &manifested.state).unwrap();

        assert_eq!(reverted.state.npc("mira").unwrap().relationship, 40);
        assert!(!reverted.state.has_fact("ledger_stolen"));
        assert_eq!(reverted.state.item_quantity("ledger"), 0);
        assert!(reverted.choice.consequences[0].reverted);
        assert_eq!(reverted.choice.consequences.len(), 1);

        let again = revert_consequence(&reverted.choice, "ledger", 5, &reverted.state);
        assert!(matches!(again, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_irreversible_consequence_cannot_be_reverted() {
        let state = village();
        let choice = choose("Break the seal", &state);
        let mut consequence = Consequence::new(
            "seal",
            vec![ConsequenceEffect::WorldFactAdded {
                fact: "seal_broken".to_owned(),
            }],
        );
        consequence.reversible = false;
        let manifested = manifest_consequence(&consequence, &choice, 3, &state);

        let result = revert_consequence(&manifested.choice, "seal", 4, &manifested.state);
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let missing = revert_consequence(&manifested.choice, "other", 4, &manifested.state);
        assert!(matches!(missing, Err(DomainError::Validation(_))));
    }
}
