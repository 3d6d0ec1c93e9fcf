//! Wayfarer Core: shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on: randomness and time sources, the command and event
//! envelopes, the domain error type, and bounded-score helpers.

pub mod bounds;
pub mod time;
pub mod command;
pub mod error;
pub mod event;
pub mod rng;
