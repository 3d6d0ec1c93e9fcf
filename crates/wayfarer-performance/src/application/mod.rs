//! Operations for the Performance Tracking & Adaptive Difficulty context.

pub mod difficulty_calculator;
pub mod tracker;
