//! Built-in catalogues used when a session does not supply its own.

use super::resource::{ResourceSource, ResourceType};
use super::risk::{RiskCategory, RiskFactor};
use super::scarcity::{ScarcityEffects, ScarcityEventTemplate, ScarcitySeverity, ScarcityTrigger};
use super::tradeoff::{TradeoffBenefit, TradeoffCost, TradeoffKind, TradeoffMechanic};

fn items(ids: &[&str]) -> ResourceSource {
    ResourceSource::Items {
        item_ids: ids.iter().map(|id| (*id).to_owned()).collect(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

/// Default resource classes.
#[must_use]
pub fn default_resources() -> Vec<ResourceType> {
    vec![
        ResourceType::new(
            "health_potions",
            "Health potions",
            items(&["health_potion", "health_potions"]),
            40.0,
            3,
            0.1,
        ),
        ResourceType::new("rations", "Rations", items(&["rations", "food"]), 25.0, 2, 0.4),
        ResourceType::new("arrows", "Arrows", items(&["arrows"]), 20.0, 5, 0.3),
        ResourceType::new("currency", "Coin", ResourceSource::Currency, 10.0, 10, 0.2),
        ResourceType::new(
            "equipment_condition",
            "Equipment condition",
            ResourceSource::EquipmentCondition,
            15.0,
            25,
            0.0,
        ),
    ]
}

/// Default scarcity event templates.
#[must_use]
pub fn default_scarcity_templates() -> Vec<ScarcityEventTemplate> {
    vec![
        ScarcityEventTemplate {
            name: "Apothecary Shortage".to_owned(),
            description: "Healers hoard their stock and prices climb.".to_owned(),
            resource_id: "health_potions".to_owned(),
            triggers: vec![
                ScarcityTrigger::ResourceBelow {
                    resource_id: "health_potions".to_owned(),
                    threshold: 3,
                },
                ScarcityTrigger::Chance { per_turn: 0.3 },
            ],
            effects: ScarcityEffects {
                availability: 0.5,
                cost: 1.5,
                quality: 1.0,
            },
            duration: 5,
            severity: ScarcitySeverity::Moderate,
        },
        ScarcityEventTemplate {
            name: "Lean Harvest".to_owned(),
            description: "Crops failed; food is scarce and poor.".to_owned(),
            resource_id: "rations".to_owned(),
            triggers: vec![
                ScarcityTrigger::ResourceBelow {
                    resource_id: "rations".to_owned(),
                    threshold: 2,
                },
                ScarcityTrigger::Chance { per_turn: 0.2 },
            ],
            effects: ScarcityEffects {
                availability: 0.6,
                cost: 1.3,
                quality: 0.8,
            },
            duration: 8,
            severity: ScarcitySeverity::Severe,
        },
        ScarcityEventTemplate {
            name: "Blacksmith Backlog".to_owned(),
            description: "Every forge in town is busy; repairs are slow and dear.".to_owned(),
            resource_id: "equipment_condition".to_owned(),
            triggers: vec![
                ScarcityTrigger::ResourceBelow {
                    resource_id: "equipment_condition".to_owned(),
                    threshold: 40,
                },
                ScarcityTrigger::Chance { per_turn: 0.15 },
            ],
            effects: ScarcityEffects {
                availability: 0.8,
                cost: 1.4,
                quality: 0.9,
            },
            duration: 4,
            severity: ScarcitySeverity::Minor,
        },
    ]
}

/// Default risk factors, one per category.
#[must_use]
pub fn default_risk_factors() -> Vec<RiskFactor> {
    vec![
        RiskFactor {
            category: RiskCategory::CombatOutnumbered,
            name: "Outnumbered".to_owned(),
            risk_level: 70.0,
            consequences: strings(&["serious injury", "capture"]),
            mitigations: strings(&["fight from a chokepoint", "call for allies", "retreat early"]),
        },
        RiskFactor {
            category: RiskCategory::ResourceInvestment,
            name: "Resource investment".to_owned(),
            risk_level: 40.0,
            consequences: strings(&["lost coin", "wasted supplies"]),
            mitigations: strings(&["invest a smaller share", "research the market"]),
        },
        RiskFactor {
            category: RiskCategory::TimePressure,
            name: "Time pressure".to_owned(),
            risk_level: 50.0,
            consequences: strings(&["missed deadline", "careless mistakes"]),
            mitigations: strings(&["prioritise objectives", "trade resources for time"]),
        },
        RiskFactor {
            category: RiskCategory::SocialReputation,
            name: "Reputation at stake".to_owned(),
            risk_level: 35.0,
            consequences: strings(&["damaged standing", "new enemies"]),
            mitigations: strings(&["gather leverage first", "bring a trusted intermediary"]),
        },
        RiskFactor {
            category: RiskCategory::ExplorationUnknown,
            name: "Unknown territory".to_owned(),
            risk_level: 45.0,
            consequences: strings(&["getting lost", "ambush"]),
            mitigations: strings(&["hire a guide", "scout ahead", "carry extra rations"]),
        },
    ]
}

/// Default trade-off offers.
#[must_use]
pub fn default_tradeoffs() -> Vec<TradeoffMechanic> {
    vec![
        TradeoffMechanic {
            id: "blood_price".to_owned(),
            name: "Blood Price".to_owned(),
            description: "Push past your limits at the cost of your health.".to_owned(),
            kind: TradeoffKind::HealthForPower,
            cost: TradeoffCost::Health { amount: 20 },
            benefit: TradeoffBenefit::StatBoost {
                stat: "strength".to_owned(),
                amount: 2,
            },
            cooldown_turns: 3,
            max_uses: None,
            min_level: 1,
        },
        TradeoffMechanic {
            id: "hire_guide".to_owned(),
            name: "Hire a Guide".to_owned(),
            description: "Pay a local to show you the hidden paths.".to_owned(),
            kind: TradeoffKind::CurrencyForService,
            cost: TradeoffCost::Currency { amount: 40 },
            benefit: TradeoffBenefit::WorldFact {
                fact: "shortcut_known".to_owned(),
            },
            cooldown_turns: 5,
            max_uses: None,
            min_level: 0,
        },
        TradeoffMechanic {
            id: "share_rations".to_owned(),
            name: "Share Rations".to_owned(),
            description: "Trade food for stories around the campfire.".to_owned(),
            kind: TradeoffKind::ItemForKnowledge,
            cost: TradeoffCost::Item {
                item_id: "rations".to_owned(),
                quantity: 2,
            },
            benefit: TradeoffBenefit::Experience { amount: 25 },
            cooldown_turns: 2,
            max_uses: Some(5),
            min_level: 0,
        },
        TradeoffMechanic {
            id: "careful_preparation".to_owned(),
            name: "Careful Preparation".to_owned(),
            description: "Spend time preparing before the next challenge.".to_owned(),
            kind: TradeoffKind::TimeForAdvantage,
            cost: TradeoffCost::Time { turns: 2 },
            benefit: TradeoffBenefit::StatBoost {
                stat: "preparation".to_owned(),
                amount: 1,
            },
            cooldown_turns: 4,
            max_uses: None,
            min_level: 2,
        },
        TradeoffMechanic {
            id: "double_or_nothing".to_owned(),
            name: "Double or Nothing".to_owned(),
            description: "Stake coin on a single throw of the dice.".to_owned(),
            kind: TradeoffKind::RiskForReward,
            cost: TradeoffCost::Currency { amount: 25 },
            benefit: TradeoffBenefit::Currency { amount: 50 },
            cooldown_turns: 1,
            max_uses: Some(3),
            min_level: 0,
        },
    ]
}
