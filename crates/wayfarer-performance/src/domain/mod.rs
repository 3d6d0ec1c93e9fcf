//! Domain types for the Performance Tracking & Adaptive Difficulty context.

pub mod difficulty;
pub mod metrics;
