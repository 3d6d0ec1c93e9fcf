//! Domain layer for the Choice Consequences & Faction Relationships context.

pub mod choice;
pub mod effect;
pub mod faction;
pub mod moral;
pub mod pending;
