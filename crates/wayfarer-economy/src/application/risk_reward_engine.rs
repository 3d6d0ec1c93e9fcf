//! Risk/reward engine.
//!
//! Assesses how dangerous a proposed action is, scales rewards by risk,
//! difficulty and time, and resolves trade-offs and investments. Every
//! probabilistic outcome is drawn from the caller's RNG.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wayfarer_core::bounds::clamp_score;
use wayfarer_core::error::DomainError;
use wayfarer_core::rng::{DeterministicRng, roll_chance};
use wayfarer_core::time::{TurnNumber, turns_elapsed};
use wayfarer_world_state::domain::character::{Character, HEALTH};
use wayfarer_world_state::domain::context::ActionContext;
use wayfarer_world_state::domain::snapshot::StoryState;

use crate::domain::catalog::{default_risk_factors, default_tradeoffs};
use crate::domain::investment::{Investment, InvestmentReturn};
use crate::domain::reward::{BaseReward, RewardScaling, ScaledReward};
use crate::domain::risk::{RiskAssessment, RiskCategory, RiskFactor};
use crate::domain::tradeoff::{
    TradeoffBenefit, TradeoffCost, TradeoffKind, TradeoffLedger, TradeoffMechanic, TradeoffOutcome,
};

const LOW_HEALTH_RATIO: f64 = 0.3;
const LOW_RESOURCE_LEVEL: i64 = 1;
const LOW_CHARACTER_LEVEL: u32 = 2;

/// Risk catalogue, trade-off catalogue and reward scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskRewardEngine {
    /// One factor per risk category.
    pub risk_factors: Vec<RiskFactor>,
    /// Offered trade-offs.
    pub tradeoffs: Vec<TradeoffMechanic>,
    /// Reward tunables.
    pub scaling: RewardScaling,
}

impl Default for RiskRewardEngine {
    fn default() -> Self {
        Self {
            risk_factors: default_risk_factors(),
            tradeoffs: default_tradeoffs(),
            scaling: RewardScaling::default(),
        }
    }
}

impl RiskRewardEngine {
    /// The engine with different reward scaling.
    #[must_use]
    pub fn with_scaling(mut self, scaling: RewardScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Looks up a trade-off.
    #[must_use]
    pub fn tradeoff(&self, tradeoff_id: &str) -> Option<&TradeoffMechanic> {
        self.tradeoffs.iter().find(|t| t.id == tradeoff_id)
    }

    /// Risk of a proposed action.
    ///
    /// The level is the mean of the matched factors, amplified by up to 30%
    /// when the character is hurt (+15%), short on resources (+10%) or low
    /// level (+5%), and capped at 100.
    #[must_use]
    pub fn assess_action_risk(
        &self,
        action_text: &str,
        context: &ActionContext,
        character: &Character,
    ) -> RiskAssessment {
        let categories = RiskCategory::infer(action_text, context);
        let factors: Vec<RiskFactor> = self
            .risk_factors
            .iter()
            .filter(|f| categories.contains(&f.category))
            .cloned()
            .collect();
        if factors.is_empty() {
            return RiskAssessment::default();
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = factors.iter().map(|f| clamp_score(f.risk_level)).sum::<f64>() / factors.len() as f64;

        let mut amplification = 0.0;
        if character.health_ratio() < LOW_HEALTH_RATIO {
            amplification += 0.15;
        }
        if context
            .lowest_resource_level()
            .is_some_and(|level| level <= LOW_RESOURCE_LEVEL)
        {
            amplification += 0.10;
        }
        if character.level <= LOW_CHARACTER_LEVEL {
            amplification += 0.05;
        }

        let mut mitigations: Vec<String> = Vec::new();
        for mitigation in factors.iter().flat_map(|f| f.mitigations.iter()) {
            if !mitigations.contains(mitigation) {
                mitigations.push(mitigation.clone());
            }
        }

        let risk_level = clamp_score(mean * (1.0 + amplification));
        debug!(risk_level, factors = factors.len(), "action risk assessed");
        RiskAssessment {
            risk_level,
            factors,
            mitigations,
            amplification,
        }
    }

    /// The compound reward multiplier.
    #[must_use]
    pub fn reward_multiplier(&self, risk_level: f64, difficulty_multiplier: f64, time_bonus: f64) -> f64 {
        let s = &self.scaling;
        let risk = clamp_score(risk_level) / 100.0;
        let multiplier = s.base_multiplier
            * (1.0 + risk * s.risk_bonus_multiplier)
            * (1.0 + (difficulty_multiplier - 1.0) * s.difficulty_bonus_multiplier)
            * (1.0 + time_bonus * s.time_bonus_multiplier);
        if multiplier.is_nan() { 0.0 } else { multiplier.max(0.0) }
    }

    /// Scales each reward axis independently, rounding down. Multipliers
    /// above the bonus threshold may also drop a bonus item.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn calculate_reward(
        &self,
        base: &BaseReward,
        risk_level: f64,
        difficulty_multiplier: f64,
        time_bonus: f64,
        rng: &mut dyn DeterministicRng,
    ) -> ScaledReward {
        let multiplier = self.reward_multiplier(risk_level, difficulty_multiplier, time_bonus);
        // Tolerance so that exact products such as 100 * 1.2 are not floored
        // one below their value.
        let floor = |value: f64| (value * multiplier + 1e-9).floor();

        let bonus_item = if multiplier > self.scaling.bonus_item_threshold
            && !self.scaling.bonus_items.is_empty()
            && roll_chance(rng, self.scaling.bonus_item_chance)
        {
            let last = u32::try_from(self.scaling.bonus_items.len() - 1).unwrap_or(u32::MAX);
            let index = rng.next_u32_range(0, last) as usize;
            self.scaling.bonus_items.get(index).cloned()
        } else {
            None
        };

        ScaledReward {
            experience: floor(base.experience as f64).max(0.0) as u64,
            currency: floor(base.currency as f64).max(0.0) as u64,
            reputation: floor(f64::from(base.reputation)) as i32,
            multiplier,
            bonus_item,
        }
    }

    /// Trade-offs the character can take right now.
    #[must_use]
    pub fn get_available_tradeoffs(
        &self,
        state: &StoryState,
        ledger: &TradeoffLedger,
        turn: TurnNumber,
    ) -> Vec<TradeoffMechanic> {
        self.tradeoffs
            .iter()
            .filter(|t| unavailable_reason(t, state, ledger, turn).is_none())
            .cloned()
            .collect()
    }

    /// Pays a trade-off's cost and resolves its benefit.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTradeoff` if the identifier is not in the
    /// catalogue, or `DomainError::Validation` if the trade-off cannot be
    /// taken right now.
    pub fn execute_tradeoff(
        &self,
        tradeoff_id: &str,
        state: &StoryState,
        ledger: &TradeoffLedger,
        turn: TurnNumber,
        rng: &mut dyn DeterministicRng,
    ) -> Result<TradeoffOutcome, DomainError> {
        let tradeoff = self
            .tradeoff(tradeoff_id)
            .ok_or_else(|| DomainError::UnknownTradeoff(tradeoff_id.to_owned()))?;
        if let Some(reason) = unavailable_reason(tradeoff, state, ledger, turn) {
            return Err(DomainError::Validation(format!(
                "trade-off {tradeoff_id} unavailable: {reason}"
            )));
        }

        let mut descriptions = vec![format!("Paid {} for {}", tradeoff.cost.describe(), tradeoff.name)];
        let paid = pay_cost(state.clone(), &tradeoff.cost);

        let benefit_granted = match tradeoff.kind {
            TradeoffKind::RiskForReward => roll_chance(rng, 0.5),
            _ => true,
        };
        let next = if benefit_granted {
            let (granted, description) = grant_benefit(paid, &tradeoff.benefit);
            descriptions.push(description);
            granted
        } else {
            descriptions.push(format!("{} came to nothing", tradeoff.name));
            paid
        };

        info!(
            tradeoff_id = %tradeoff.id,
            turn,
            benefit_granted,
            "trade-off executed"
        );

        Ok(TradeoffOutcome {
            state: next,
            ledger: ledger.with_use(&tradeoff.id, turn),
            tradeoff_id: tradeoff.id.clone(),
            benefit_granted,
            descriptions,
        })
    }

    /// Commits coin to a venture.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the principal is zero or more than
    /// the character carries.
    pub fn open_investment(
        &self,
        name: &str,
        principal: u64,
        risk_level: f64,
        state: &StoryState,
        turn: TurnNumber,
    ) -> Result<(StoryState, Investment), DomainError> {
        if principal == 0 {
            return Err(DomainError::Validation("investment principal must be positive".to_owned()));
        }
        if state.character.currency < principal {
            return Err(DomainError::Validation(format!(
                "cannot invest {principal} coin with {} on hand",
                state.character.currency
            )));
        }
        let mut next = state.clone();
        next.character.currency -= principal;
        Ok((next, Investment::new(name, principal, risk_level, turn)))
    }

    /// Resolves an investment at `current_turn`.
    ///
    /// Success probability is `1 - 0.7 * risk / 100`. Success pays
    /// `principal * (1 + 0.02 * elapsed * (1 + risk / 100))`; failure returns
    /// half the principal.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn calculate_investment_return(
        &self,
        investment: &Investment,
        current_turn: TurnNumber,
        rng: &mut dyn DeterministicRng,
    ) -> InvestmentReturn {
        let risk = clamp_score(investment.risk_level) / 100.0;
        let elapsed = turns_elapsed(investment.opened_turn, current_turn);
        let success_probability = 1.0 - 0.7 * risk;
        let success = roll_chance(rng, success_probability);
        let payout = if success {
            let growth = 1.0 + 0.02 * f64::from(elapsed) * (1.0 + risk);
            (investment.principal as f64 * growth).floor() as u64
        } else {
            investment.principal / 2
        };
        InvestmentReturn {
            investment_id: investment.id,
            success,
            payout,
            elapsed_turns: elapsed,
            success_probability,
        }
    }
}

/// Credits an investment payout to the character.
#[must_use]
pub fn settle_investment(state: &StoryState, outcome: &InvestmentReturn) -> StoryState {
    let mut next = state.clone();
    next.character.currency = next.character.currency.saturating_add(outcome.payout);
    next
}

fn unavailable_reason(
    tradeoff: &TradeoffMechanic,
    state: &StoryState,
    ledger: &TradeoffLedger,
    turn: TurnNumber,
) -> Option<String> {
    if state.character.level < tradeoff.min_level {
        return Some(format!("requires level {}", tradeoff.min_level));
    }
    if let Some(max) = tradeoff.max_uses {
        if ledger.uses_of(&tradeoff.id) >= max {
            return Some("no uses left".to_owned());
        }
    }
    if let Some(last) = ledger.last_used(&tradeoff.id) {
        let since = turns_elapsed(last, turn);
        if since < tradeoff.cooldown_turns {
            return Some(format!("on cooldown for {} turn(s)", tradeoff.cooldown_turns - since));
        }
    }
    let affordable = match &tradeoff.cost {
        TradeoffCost::Health { amount } => state.character.health > *amount,
        TradeoffCost::Currency { amount } => state.character.currency >= *amount,
        TradeoffCost::Item { item_id, quantity } => state.item_quantity(item_id) >= *quantity,
        TradeoffCost::Time { turns } => state
            .active_quests()
            .filter_map(|q| q.turns_remaining(state.turn))
            .all(|remaining| remaining > *turns),
    };
    if affordable {
        None
    } else {
        Some(format!("cannot afford {}", tradeoff.cost.describe()))
    }
}

fn pay_cost(state: StoryState, cost: &TradeoffCost) -> StoryState {
    match cost {
        TradeoffCost::Health { amount } => {
            let character = state.character.clone().with_stat_delta(HEALTH, -amount);
            StoryState { character, ..state }
        }
        TradeoffCost::Currency { amount } => {
            let mut next = state;
            next.character.currency = next.character.currency.saturating_sub(*amount);
            next
        }
        TradeoffCost::Item { item_id, quantity } => state.with_item_removed(item_id, *quantity),
        TradeoffCost::Time { turns } => StoryState {
            turn: state.turn.saturating_add(*turns),
            ..state
        },
    }
}

fn grant_benefit(state: StoryState, benefit: &TradeoffBenefit) -> (StoryState, String) {
    match benefit {
        TradeoffBenefit::StatBoost { stat, amount } => {
            let character = state.character.clone().with_stat_delta(stat, *amount);
            (StoryState { character, ..state }, format!("{stat} +{amount}"))
        }
        TradeoffBenefit::Currency { amount } => {
            let mut next = state;
            next.character.currency = next.character.currency.saturating_add(*amount);
            (next, format!("Gained {amount} coin"))
        }
        TradeoffBenefit::Experience { amount } => {
            let mut next = state;
            next.character.experience = next.character.experience.saturating_add(*amount);
            (next, format!("Gained {amount} experience"))
        }
        TradeoffBenefit::Item {
            item_id,
            name,
            quantity,
        } => (
            state.with_item_added(item_id, name, *quantity),
            format!("Received {quantity} x {name}"),
        ),
        TradeoffBenefit::WorldFact { fact } => {
            let mut next = state;
            if !next.has_fact(fact) {
                next.world_facts.push(fact.clone());
            }
            (next, format!("Learned: {fact}"))
        }
    }
}
