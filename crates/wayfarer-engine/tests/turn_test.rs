//! Integration tests for the turn coordinator.

mod common;

use serde_json::json;
use uuid::Uuid;
use wayfarer_consequence::domain::moral::Alignment;
use wayfarer_core::error::DomainError;
use wayfarer_core::event::DomainEvent;
use wayfarer_engine::config::EngineSettings;
use wayfarer_engine::domain::commands::ExecuteTradeoff;
use wayfarer_performance::domain::difficulty::{DifficultyPreset, DifficultyProfile};
use wayfarer_test_support::MockRng;
use wayfarer_world_state::domain::inventory::InventoryItem;

#[test]
fn test_apothecary_shortage_starts_and_runs_its_course() {
    // Arrange
    let mut state = common::frontier_state();
    state.inventory[0] = InventoryItem::new("health_potion", "Health Potion", 1);
    let mut coordinator =
        common::coordinator_with(EngineSettings::default(), common::frontier_world(state));
    let mut stocked = common::coordinator();
    let mut rng = MockRng;

    // Act
    let first = coordinator.process_turn(&common::turn(json!({})), &mut rng).unwrap();
    stocked.process_turn(&common::turn(json!({})), &mut rng).unwrap();

    // Assert
    assert_eq!(first.new_scarcity_events, vec!["Apothecary Shortage".to_owned()]);
    assert!(
        first
            .resource_warnings
            .iter()
            .any(|w| w.resource_id == "health_potions")
    );
    assert!(
        coordinator.market_price(10, "health_potions") > stocked.market_price(10, "health_potions")
    );

    for _ in 0..4 {
        let report = coordinator.process_turn(&common::turn(json!({})), &mut rng).unwrap();
        assert!(report.expired_scarcity_events.is_empty());
    }
    let sixth = coordinator.process_turn(&common::turn(json!({})), &mut rng).unwrap();
    assert_eq!(sixth.expired_scarcity_events, vec!["Apothecary Shortage".to_owned()]);
}

#[test]
fn test_winning_streak_tightens_difficulty_more_than_losing_streak() {
    // Arrange
    let mut winner = common::coordinator();
    let mut loser = common::coordinator();
    let mut rng = MockRng;

    // Act
    for _ in 0..6 {
        winner
            .process_turn(
                &common::turn(json!({
                    "action": "hold the ford",
                    "combat": { "result": "victory", "damage_taken": 5.0 }
                })),
                &mut rng,
            )
            .unwrap();
        loser
            .process_turn(
                &common::turn(json!({
                    "action": "hold the ford",
                    "combat": { "result": "defeat", "damage_taken": 60.0 }
                })),
                &mut rng,
            )
            .unwrap();
    }

    // Assert
    let strong = winner.world().difficulty;
    let weak = loser.world().difficulty;
    assert!(strong.combat_scaling > weak.combat_scaling);
    assert!(winner.world().metrics.combat_win_rate > loser.world().metrics.combat_win_rate);
    assert!(loser.world().active_failure.is_some());
}

#[test]
fn test_delayed_consequence_from_json_lands_on_its_turn() {
    // Arrange
    let mut coordinator = common::coordinator();
    let mut rng = MockRng;
    let choice = json!({
        "action": "skim the toll chest",
        "choice": {
            "text": "pocket a share of the wardens' tolls",
            "moral_tag": "evil",
            "consequences": [
                {
                    "id": "coin",
                    "effects": [{ "type": "stat_delta", "stat": "currency", "delta": 30 }]
                },
                {
                    "id": "audit",
                    "description": "The wardens audit the chest",
                    "delay_turns": 2,
                    "effects": [{ "type": "faction_delta", "faction_id": "river_wardens", "delta": -25 }]
                }
            ]
        }
    });

    // Act
    let first = coordinator.process_turn(&common::turn(choice), &mut rng).unwrap();
    let second = coordinator.process_turn(&common::turn(json!({})), &mut rng).unwrap();
    let third = coordinator.process_turn(&common::turn(json!({})), &mut rng).unwrap();

    // Assert
    assert_eq!(coordinator.world().state.character.currency, 150);
    assert_eq!(first.choice.as_ref().unwrap().consequences.len(), 1);
    assert!(second.effects.is_empty());
    assert!(!third.effects.is_empty());
    let standing = coordinator.world().state.standing("river_wardens");
    assert_eq!(standing.reputation, -25);
    assert!(third.political_influence.player_influence < 0.0);
}

#[test]
fn test_repeated_good_choices_shift_alignment() {
    // Arrange
    let mut coordinator = common::coordinator();
    let mut rng = MockRng;
    let kindness = json!({
        "choice": { "text": "share rations with the refugees", "moral_tag": "good" }
    });

    // Act
    let first = coordinator
        .process_turn(&common::turn(kindness.clone()), &mut rng)
        .unwrap();
    let second = coordinator.process_turn(&common::turn(kindness), &mut rng).unwrap();

    // Assert
    assert_eq!(first.moral_profile.alignment, Alignment::TrueNeutral);
    assert_eq!(second.moral_profile.alignment, Alignment::NeutralGood);
    assert_eq!(second.moral_profile.history.len(), 2);
    let shifted = coordinator
        .take_uncommitted_events()
        .into_iter()
        .filter(|e| e.event_type() == "consequence.alignment_shifted")
        .count();
    assert_eq!(shifted, 1);
}

#[test]
fn test_event_sequence_is_contiguous_across_turns() {
    // Arrange
    let mut coordinator = common::coordinator();
    let mut rng = MockRng;
    let mut collected = Vec::new();

    // Act
    for _ in 0..3 {
        let command = common::turn(json!({
            "choice": { "text": "scout the far bank" },
            "combat": { "result": "victory" }
        }));
        coordinator.process_turn(&command, &mut rng).unwrap();
        let events = coordinator.take_uncommitted_events();
        assert!(events.iter().all(|e| e.metadata().correlation_id == command.correlation_id));
        collected.extend(events);
    }

    // Assert
    let sequence: Vec<i64> = collected.iter().map(|e| e.metadata().sequence_number).collect();
    let expected: Vec<i64> = (1..=i64::try_from(collected.len()).unwrap()).collect();
    assert_eq!(sequence, expected);
    assert_eq!(coordinator.version(), i64::try_from(collected.len()).unwrap());
    assert!(
        collected
            .iter()
            .all(|e| e.metadata().session_id == coordinator.session_id())
    );
}

#[test]
fn test_yaml_settings_pin_a_static_difficulty() {
    // Arrange
    let settings = EngineSettings::from_yaml_str(
        "
difficulty:
  preset: hard
  dynamic_adjustment: false
",
    )
    .unwrap();
    let mut coordinator =
        common::coordinator_with(settings, common::frontier_world(common::frontier_state()));

    // Act
    let report = coordinator
        .process_turn(
            &common::turn(json!({ "combat": { "result": "victory" } })),
            &mut MockRng,
        )
        .unwrap();

    // Assert
    assert_eq!(
        report.difficulty,
        DifficultyPreset::Hard.base_profile(None).clamped()
    );
    assert_ne!(report.difficulty, DifficultyProfile::default());
}

#[test]
fn test_rejected_turn_leaves_no_trace() {
    // Arrange
    let mut coordinator = common::coordinator();
    let before = coordinator.world().clone();

    // Act
    let result = coordinator.process_turn(
        &common::turn(json!({
            "choice": { "text": "swear an oath", "moral_tag": "good" },
            "quest_outcomes": [{ "quest_id": "missing", "success": false }]
        })),
        &mut MockRng,
    );

    // Assert
    assert_eq!(result, Err(DomainError::UnknownQuest("missing".to_owned())));
    assert_eq!(coordinator.world(), &before);
    assert!(coordinator.take_uncommitted_events().is_empty());
}

#[test]
fn test_tradeoff_between_turns_is_recorded_in_the_ledger() {
    // Arrange
    let mut coordinator = common::coordinator();
    coordinator
        .process_turn(&common::turn(json!({})), &mut MockRng)
        .unwrap();
    let offered = coordinator.available_tradeoffs();
    let tradeoff_id = offered[0].id.clone();

    // Act
    let outcome = coordinator
        .execute_tradeoff(
            &ExecuteTradeoff {
                correlation_id: Uuid::new_v4(),
                tradeoff_id: tradeoff_id.clone(),
            },
            &mut MockRng,
        )
        .unwrap();

    // Assert
    assert_eq!(outcome.tradeoff_id, tradeoff_id);
    assert_eq!(coordinator.world().tradeoff_ledger.uses_of(&tradeoff_id), 1);
    let types: Vec<&str> = coordinator
        .take_uncommitted_events()
        .iter()
        .map(DomainEvent::event_type)
        .collect();
    assert_eq!(types.last(), Some(&"economy.tradeoff_executed"));
}
