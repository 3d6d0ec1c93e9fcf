//! Domain layer for the turn coordinator.

pub mod commands;
pub mod events;
pub mod report;
pub mod world;
