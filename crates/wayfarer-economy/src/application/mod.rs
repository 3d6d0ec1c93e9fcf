//! Operations for the Scarcity and Risk/Reward context.

pub mod risk_reward_engine;
pub mod scarcity_manager;
