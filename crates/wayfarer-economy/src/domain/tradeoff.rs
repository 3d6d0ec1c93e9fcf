//! Trade-off mechanics: explicit cost-for-benefit offers.

use serde::{Deserialize, Serialize};
use wayfarer_core::time::TurnNumber;
use wayfarer_world_state::domain::snapshot::StoryState;

/// Family of trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeoffKind {
    /// Pay in health, gain capability.
    HealthForPower,
    /// Pay in coin, gain a service.
    CurrencyForService,
    /// Pay in goods, gain experience or knowledge.
    ItemForKnowledge,
    /// Pay in time, gain an edge.
    TimeForAdvantage,
    /// Pay, then flip a coin for the payout.
    RiskForReward,
}

/// What a trade-off costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum TradeoffCost {
    /// Hit points; the character must keep at least one.
    Health {
        /// Hit points spent.
        amount: i32,
    },
    /// Coin.
    Currency {
        /// Coin spent.
        amount: u64,
    },
    /// Inventory items.
    Item {
        /// Item consumed.
        item_id: String,
        /// Units consumed.
        quantity: u32,
    },
    /// Turns of story time.
    Time {
        /// Turns spent.
        turns: u32,
    },
}

impl TradeoffCost {
    /// Short description for effect lists.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Health { amount } => format!("{amount} health"),
            Self::Currency { amount } => format!("{amount} coin"),
            Self::Item { item_id, quantity } => format!("{quantity} x {item_id}"),
            Self::Time { turns } => format!("{turns} turn(s)"),
        }
    }
}

/// What a trade-off grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeoffBenefit {
    /// A stat increase.
    StatBoost {
        /// Stat name.
        stat: String,
        /// Amount added.
        amount: i32,
    },
    /// Coin.
    Currency {
        /// Coin granted.
        amount: u64,
    },
    /// Experience.
    Experience {
        /// Experience granted.
        amount: u64,
    },
    /// Items.
    Item {
        /// Item identifier.
        item_id: String,
        /// Display name.
        name: String,
        /// Units granted.
        quantity: u32,
    },
    /// A world fact becomes true.
    WorldFact {
        /// The fact.
        fact: String,
    },
}

/// A catalogued trade-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeoffMechanic {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Narrative description.
    #[serde(default)]
    pub description: String,
    /// Family.
    pub kind: TradeoffKind,
    /// Price.
    pub cost: TradeoffCost,
    /// Payout.
    pub benefit: TradeoffBenefit,
    /// Turns between uses.
    #[serde(default)]
    pub cooldown_turns: u32,
    /// Lifetime use limit.
    #[serde(default)]
    pub max_uses: Option<u32>,
    /// Minimum character level.
    #[serde(default)]
    pub min_level: u32,
}

/// One recorded use of a trade-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeoffUse {
    /// Trade-off used.
    pub tradeoff_id: String,
    /// Turn it was used.
    pub turn: TurnNumber,
}

/// Append-only record of trade-off uses, for cooldowns and limits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeoffLedger {
    /// Every use, oldest first.
    pub uses: Vec<TradeoffUse>,
}

impl TradeoffLedger {
    /// Lifetime uses of a trade-off.
    #[must_use]
    pub fn uses_of(&self, tradeoff_id: &str) -> u32 {
        let count = self
            .uses
            .iter()
            .filter(|u| u.tradeoff_id == tradeoff_id)
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Turn of the most recent use.
    #[must_use]
    pub fn last_used(&self, tradeoff_id: &str) -> Option<TurnNumber> {
        self.uses
            .iter()
            .rev()
            .find(|u| u.tradeoff_id == tradeoff_id)
            .map(|u| u.turn)
    }

    /// The ledger with one more use recorded.
    #[must_use]
    pub fn with_use(&self, tradeoff_id: &str, turn: TurnNumber) -> Self {
        let mut uses = self.uses.clone();
        uses.push(TradeoffUse {
            tradeoff_id: tradeoff_id.to_owned(),
            turn,
        });
        Self { uses }
    }
}

/// Result of executing a trade-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffOutcome {
    /// Story state after cost and benefit.
    pub state: StoryState,
    /// Ledger with this use recorded.
    pub ledger: TradeoffLedger,
    /// Trade-off executed.
    pub tradeoff_id: String,
    /// Whether the benefit was granted; only risk-for-reward can lose it.
    pub benefit_granted: bool,
    /// Human-readable effects.
    pub descriptions: Vec<String>,
}
