//! Wayfarer: Scarcity and Risk/Reward bounded context.
//!
//! Responsible for deriving live resource counts from the story state,
//! triggering and ageing scarcity events, assessing action risk, scaling
//! rewards, and resolving trade-offs and investments.

pub mod application;
pub mod domain;
