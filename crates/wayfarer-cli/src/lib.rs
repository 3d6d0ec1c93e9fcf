//! Wayfarer CLI: plays a scenario file through the engine.
//!
//! A scenario is a starting story state, a faction graph and a list of turn
//! inputs. Each turn runs through one [`Coordinator`] and yields a
//! [`TurnReport`] that the binary prints as a JSON line.
//!
//! [`Coordinator`]: wayfarer_engine::application::coordinator::Coordinator
//! [`TurnReport`]: wayfarer_engine::domain::report::TurnReport

pub mod error;
pub mod runner;
pub mod scenario;
