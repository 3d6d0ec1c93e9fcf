//! Wayfarer: Failure & Recovery bounded context.
//!
//! Classifies failed actions, offers the recovery mechanics a character can
//! actually use, resolves recovery attempts into immutable records, and
//! summarises a player's resilience from those records.

pub mod application;
pub mod domain;
