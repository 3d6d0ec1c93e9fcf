//! Application layer for the turn coordinator.

pub mod coordinator;
