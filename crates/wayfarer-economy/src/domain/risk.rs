//! Risk factors and assessments.

use serde::{Deserialize, Serialize};
use wayfarer_world_state::domain::context::ActionContext;

/// A named category of danger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Fighting at a numerical disadvantage.
    CombatOutnumbered,
    /// Putting money or goods on the line.
    ResourceInvestment,
    /// Acting against the clock.
    TimePressure,
    /// Staking one's reputation.
    SocialReputation,
    /// Heading into the unknown.
    ExplorationUnknown,
}

const COMBAT_WORDS: &[&str] = &["attack", "fight", "charge", "ambush", "duel", "assault"];
const INVESTMENT_WORDS: &[&str] = &["invest", "buy", "spend", "wager", "gamble", "trade"];
const TIME_WORDS: &[&str] = &["rush", "hurry", "quickly", "race", "before dawn", "deadline"];
const SOCIAL_WORDS: &[&str] = &[
    "persuade", "lie", "bribe", "threaten", "negotiate", "insult", "deceive", "intimidate",
];
const EXPLORATION_WORDS: &[&str] = &["explore", "venture", "descend", "search", "unknown", "uncharted"];

impl RiskCategory {
    /// Every category matched by the action text and context, in
    /// declaration order. Single keywords match word prefixes, so
    /// "attacking" counts as "attack" but "allies" does not count as "lie".
    #[must_use]
    pub fn infer(action_text: &str, context: &ActionContext) -> Vec<Self> {
        let text = action_text.to_lowercase();
        let tokens: Vec<&str> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        let mentions = |words: &[&str]| {
            words.iter().any(|w| {
                if w.contains(' ') {
                    text.contains(w)
                } else {
                    tokens.iter().any(|t| t.starts_with(w))
                }
            })
        };

        let mut matched = Vec::new();
        if context.is_outnumbered()
            || (mentions(COMBAT_WORDS) && context.enemy_count > context.ally_count)
        {
            matched.push(Self::CombatOutnumbered);
        }
        if mentions(INVESTMENT_WORDS) {
            matched.push(Self::ResourceInvestment);
        }
        if context.time_pressure || mentions(TIME_WORDS) {
            matched.push(Self::TimePressure);
        }
        if mentions(SOCIAL_WORDS) {
            matched.push(Self::SocialReputation);
        }
        if mentions(EXPLORATION_WORDS) {
            matched.push(Self::ExplorationUnknown);
        }
        matched
    }
}

/// A catalogued danger with its level and remedies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Category this factor describes.
    pub category: RiskCategory,
    /// Display name.
    pub name: String,
    /// Risk level in `[0, 100]`.
    pub risk_level: f64,
    /// What can go wrong.
    #[serde(default)]
    pub consequences: Vec<String>,
    /// What the player can do about it.
    #[serde(default)]
    pub mitigations: Vec<String>,
}

/// The risk of one proposed action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Overall level in `[0, 100]`.
    pub risk_level: f64,
    /// Factors that matched.
    pub factors: Vec<RiskFactor>,
    /// Suggested mitigations, deduplicated.
    pub mitigations: Vec<String>,
    /// Fractional amplification applied for the character's condition.
    pub amplification: f64,
}
