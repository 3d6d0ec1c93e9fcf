//! Story-state records.

pub mod character;
pub mod context;
pub mod inventory;
pub mod moral;
pub mod npc;
pub mod quest;
pub mod snapshot;
pub mod standing;
