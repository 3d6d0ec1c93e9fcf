//! Wayfarer: turn coordinator.
//!
//! Owns one [`World`](domain::world::World) per session and runs each turn
//! through every bounded context in a fixed order: performance, scarcity,
//! risk and reward, failure detection, consequences, faction ripples, quest
//! checks and finally difficulty. Every committed change is described by an
//! [`EngineEvent`](domain::events::EngineEvent) waiting to be drained by the
//! persistence collaborator.

pub mod application;
pub mod config;
pub mod domain;
