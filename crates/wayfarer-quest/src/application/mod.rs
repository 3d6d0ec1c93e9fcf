//! Operations for the Quest State Machine context.

pub mod conditions;
pub mod state_machine;
