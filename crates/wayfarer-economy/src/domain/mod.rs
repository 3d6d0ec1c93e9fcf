//! Domain layer for the Scarcity and Risk/Reward context.

pub mod catalog;
pub mod investment;
pub mod resource;
pub mod reward;
pub mod risk;
pub mod scarcity;
pub mod tradeoff;
