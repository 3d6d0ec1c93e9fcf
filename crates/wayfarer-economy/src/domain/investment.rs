//! Investments: principal put at risk for a return over time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::time::TurnNumber;

/// Coin committed to a venture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    /// Identifier.
    pub id: Uuid,
    /// What the money went into.
    pub name: String,
    /// Coin committed.
    pub principal: u64,
    /// Risk in `[0, 100]`.
    pub risk_level: f64,
    /// Turn the money was committed.
    pub opened_turn: TurnNumber,
}

impl Investment {
    /// Opens an investment at `turn`.
    #[must_use]
    pub fn new(name: impl Into<String>, principal: u64, risk_level: f64, turn: TurnNumber) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            principal,
            risk_level: wayfarer_core::bounds::clamp_score(risk_level),
            opened_turn: turn,
        }
    }
}

/// How an investment paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentReturn {
    /// The investment resolved.
    pub investment_id: Uuid,
    /// Whether the venture succeeded.
    pub success: bool,
    /// Coin returned to the player.
    pub payout: u64,
    /// Turns the money was tied up.
    pub elapsed_turns: u32,
    /// Probability of success that was rolled against.
    pub success_probability: f64,
}
