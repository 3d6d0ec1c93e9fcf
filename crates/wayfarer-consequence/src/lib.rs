//! Wayfarer: Choice Consequences & Faction Relationships bounded context.
//!
//! Responsible for recording player choices, manifesting their typed
//! effects onto the story state, tracking the player's moral alignment, and
//! maintaining the directed faction relationship graph that ripples
//! standing changes back into new effects.

pub mod application;
pub mod domain;
