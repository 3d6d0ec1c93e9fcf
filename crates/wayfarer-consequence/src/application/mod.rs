//! Operations for the Choice Consequences & Faction Relationships context.

pub mod faction_graph;
pub mod moral_compass;
pub mod propagator;
