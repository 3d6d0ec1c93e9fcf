//! Domain layer for the Quest State Machine context.

pub mod failure;
pub mod prerequisite;
