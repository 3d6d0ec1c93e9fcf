//! Shared helpers for coordinator integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use uuid::Uuid;
use wayfarer_consequence::domain::faction::Faction;
use wayfarer_core::time::Clock;
use wayfarer_engine::application::coordinator::Coordinator;
use wayfarer_engine::config::EngineSettings;
use wayfarer_engine::domain::commands::ProcessTurn;
use wayfarer_engine::domain::report::TurnInput;
use wayfarer_engine::domain::world::World;
use wayfarer_test_support::fixed_clock;
use wayfarer_world_state::domain::inventory::InventoryItem;
use wayfarer_world_state::domain::snapshot::StoryState;

/// A well-stocked party at the river crossing with two rival factions.
pub fn frontier_state() -> StoryState {
    let mut state = StoryState {
        location: "Millford Crossing".to_owned(),
        inventory: vec![
            InventoryItem::new("health_potion", "Health Potion", 5),
            InventoryItem::new("rations", "Rations", 6),
            InventoryItem::new("arrows", "Arrows", 20),
        ],
        ..StoryState::default()
    };
    state.character.currency = 120;
    state
}

/// The frontier state plus the river factions.
pub fn frontier_world(state: StoryState) -> World {
    let mut wardens = Faction::new("river_wardens", "River Wardens", 55.0);
    wardens.influence.political = 60.0;
    let mut syndicate = Faction::new("salt_syndicate", "Salt Syndicate", 45.0);
    syndicate.influence.political = 40.0;
    World::new(state).with_factions(vec![wardens, syndicate])
}

/// A coordinator over `world` with a fixed clock.
pub fn coordinator_with(settings: EngineSettings, world: World) -> Coordinator {
    let clock: Arc<dyn Clock> = Arc::new(fixed_clock());
    Coordinator::new(Uuid::new_v4(), settings, world, clock)
}

/// A coordinator over the default frontier world.
pub fn coordinator() -> Coordinator {
    coordinator_with(EngineSettings::default(), frontier_world(frontier_state()))
}

/// Builds a turn command from generator JSON.
pub fn turn(json: serde_json::Value) -> ProcessTurn {
    let input: TurnInput = serde_json::from_value(json).unwrap();
    ProcessTurn::new(input)
}
