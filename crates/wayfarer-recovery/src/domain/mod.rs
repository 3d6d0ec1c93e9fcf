//! Domain layer for the Failure & Recovery context.

pub mod catalog;
pub mod failure;
pub mod mechanic;
pub mod record;
