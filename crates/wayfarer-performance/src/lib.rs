//! Wayfarer: Performance Tracking & Adaptive Difficulty bounded context.
//!
//! Responsible for turning reported combat, resource and quest outcomes
//! into rolling skill metrics, and for turning those metrics into a clamped
//! per-axis difficulty profile.

pub mod application;
pub mod domain;
