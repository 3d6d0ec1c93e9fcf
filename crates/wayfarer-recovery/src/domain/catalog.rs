//! Built-in recovery mechanics.

use super::failure::FailureCategory;
use super::mechanic::{RecoveryEffect, RecoveryMechanic, RecoveryRequirements};

fn lessons(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| (*l).to_owned()).collect()
}

/// Default recovery catalogue.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn default_mechanics() -> Vec<RecoveryMechanic> {
    vec![
        RecoveryMechanic {
            id: "second_wind".to_owned(),
            name: "Second Wind".to_owned(),
            description: "Drag yourself back to your feet.".to_owned(),
            applies_to: vec![FailureCategory::CombatDefeat],
            success_chance: 70.0,
            cost: 0,
            time_limit: Some(1),
            requirements: RecoveryRequirements::default(),
            effects: vec![RecoveryEffect::RestoreHealth { amount: 30 }],
            lessons: lessons(&["Pick fights you can walk away from"]),
        },
        RecoveryMechanic {
            id: "temple_healing".to_owned(),
            name: "Temple Healing".to_owned(),
            description: "Pay the priests to mend your wounds.".to_owned(),
            applies_to: vec![FailureCategory::CombatDefeat],
            success_chance: 95.0,
            cost: 50,
            time_limit: None,
            requirements: RecoveryRequirements::default(),
            effects: vec![
                RecoveryEffect::RestoreHealth { amount: 100 },
                RecoveryEffect::ReduceStress { amount: 20 },
            ],
            lessons: lessons(&["Keep coin aside for healing"]),
        },
        RecoveryMechanic {
            id: "seek_new_lead".to_owned(),
            name: "Seek a New Lead".to_owned(),
            description: "Ask around for another way to reach the goal.".to_owned(),
            applies_to: vec![FailureCategory::QuestFailure],
            success_chance: 60.0,
            cost: 0,
            time_limit: Some(3),
            requirements: RecoveryRequirements::default(),
            effects: vec![RecoveryEffect::WorldFact {
                fact: "new_lead_found".to_owned(),
            }],
            lessons: lessons(&["Most goals have more than one path"]),
        },
        RecoveryMechanic {
            id: "bribe_informant".to_owned(),
            name: "Bribe an Informant".to_owned(),
            description: "Coin loosens tongues and opens doors.".to_owned(),
            applies_to: vec![FailureCategory::QuestFailure, FailureCategory::SocialFailure],
            success_chance: 75.0,
            cost: 30,
            time_limit: None,
            requirements: RecoveryRequirements {
                location: None,
                min_level: 2,
            },
            effects: vec![RecoveryEffect::WorldFact {
                fact: "informant_owes_favour".to_owned(),
            }],
            lessons: lessons(&["Information has a price"]),
        },
        RecoveryMechanic {
            id: "forage".to_owned(),
            name: "Forage".to_owned(),
            description: "Live off the land for a while.".to_owned(),
            applies_to: vec![FailureCategory::ResourceDepletion],
            success_chance: 65.0,
            cost: 0,
            time_limit: None,
            requirements: RecoveryRequirements::default(),
            effects: vec![RecoveryEffect::GrantItem {
                item_id: "rations".to_owned(),
                name: "Rations".to_owned(),
                quantity: 2,
            }],
            lessons: lessons(&["Restock before supplies run dry"]),
        },
        RecoveryMechanic {
            id: "guild_loan".to_owned(),
            name: "Guild Loan".to_owned(),
            description: "The merchants' guild extends credit to known faces.".to_owned(),
            applies_to: vec![FailureCategory::ResourceDepletion],
            success_chance: 90.0,
            cost: 0,
            time_limit: None,
            requirements: RecoveryRequirements {
                location: Some("Market Square".to_owned()),
                min_level: 3,
            },
            effects: vec![RecoveryEffect::GrantCurrency { amount: 50 }],
            lessons: lessons(&["Reputation is a form of wealth"]),
        },
        RecoveryMechanic {
            id: "make_amends".to_owned(),
            name: "Make Amends".to_owned(),
            description: "Apologise and offer a token of good will.".to_owned(),
            applies_to: vec![FailureCategory::SocialFailure],
            success_chance: 55.0,
            cost: 10,
            time_limit: Some(2),
            requirements: RecoveryRequirements::default(),
            effects: vec![RecoveryEffect::ReduceStress { amount: 10 }],
            lessons: lessons(&["Read the room before pressing a point"]),
        },
        RecoveryMechanic {
            id: "retrace_steps".to_owned(),
            name: "Retrace Your Steps".to_owned(),
            description: "Follow your own tracks back to familiar ground.".to_owned(),
            applies_to: vec![FailureCategory::ExplorationFailure],
            success_chance: 70.0,
            cost: 0,
            time_limit: None,
            requirements: RecoveryRequirements::default(),
            effects: vec![RecoveryEffect::WorldFact {
                fact: "path_remembered".to_owned(),
            }],
            lessons: lessons(&["Mark your trail in unknown country"]),
        },
        RecoveryMechanic {
            id: "hire_tracker".to_owned(),
            name: "Hire a Tracker".to_owned(),
            description: "A local tracker leads you out for a fee.".to_owned(),
            applies_to: vec![FailureCategory::ExplorationFailure],
            success_chance: 90.0,
            cost: 40,
            time_limit: None,
            requirements: RecoveryRequirements::default(),
            effects: vec![RecoveryEffect::ReduceStress { amount: 15 }],
            lessons: lessons(&["A guide costs less than a lost week"]),
        },
    ]
}
