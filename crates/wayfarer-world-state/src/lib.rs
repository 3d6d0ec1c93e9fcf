//! Wayfarer: story-state snapshot.
//!
//! The narrative generator hands the engine a snapshot of the story each
//! turn: the character, inventory and equipment, quests, tracked NPCs,
//! faction standings and world facts. Every bounded context reads these
//! records and returns updated copies; none of them keeps its own.

pub mod domain;
