//! Reward scaling.

use serde::{Deserialize, Serialize};

/// Reward scaling tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardScaling {
    /// Flat multiplier applied to every reward.
    pub base_multiplier: f64,
    /// Bonus per unit of risk (`risk / 100`).
    pub risk_bonus_multiplier: f64,
    /// Bonus per unit of difficulty above `1.0`.
    pub difficulty_bonus_multiplier: f64,
    /// Bonus per unit of time bonus.
    pub time_bonus_multiplier: f64,
    /// Multiplier above which a bonus item may drop.
    pub bonus_item_threshold: f64,
    /// Probability of a bonus item once over the threshold.
    pub bonus_item_chance: f64,
    /// Pool bonus items are drawn from.
    pub bonus_items: Vec<String>,
}

impl Default for RewardScaling {
    fn default() -> Self {
        Self {
            base_multiplier: 1.0,
            risk_bonus_multiplier: 0.2,
            difficulty_bonus_multiplier: 0.5,
            time_bonus_multiplier: 0.25,
            bonus_item_threshold: 1.5,
            bonus_item_chance: 0.3,
            bonus_items: vec![
                "minor_relic".to_owned(),
                "rare_herb".to_owned(),
                "masterwork_whetstone".to_owned(),
            ],
        }
    }
}

/// An unscaled reward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseReward {
    /// Experience points.
    pub experience: u64,
    /// Coin.
    pub currency: u64,
    /// Reputation with whoever hands out the reward.
    pub reputation: i32,
}

/// A reward after risk, difficulty and time scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledReward {
    /// Experience points, rounded down.
    pub experience: u64,
    /// Coin, rounded down.
    pub currency: u64,
    /// Reputation, rounded down.
    pub reputation: i32,
    /// The compound multiplier applied.
    pub multiplier: f64,
    /// Bonus item, when one dropped.
    pub bonus_item: Option<String>,
}
