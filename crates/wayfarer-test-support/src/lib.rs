//! Shared test doubles for the Wayfarer balance engine.

mod clock;
mod rng;

pub use clock::{FixedClock, fixed_clock};
pub use rng::{MockRng, SequenceRng};
