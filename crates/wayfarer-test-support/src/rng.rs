//! Test RNG: deterministic `DeterministicRng` implementations for tests.

use wayfarer_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min` for `next_u32_range` and `0.0` for
/// `next_f64`. Every probability check against it succeeds, which makes it
/// the "lucky" RNG in tests that do not care about specific values.
#[derive(Debug, Default)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that replays predetermined sequences. Integer and float draws are
/// scripted independently. Panics if a sequence is exhausted so a test that
/// draws more than it scripted fails loudly.
#[derive(Debug, Default)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
    floats: Vec<f64>,
    float_index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` that replays the given integer values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Create a new `SequenceRng` that replays the given float values.
    #[must_use]
    pub fn floats(floats: Vec<f64>) -> Self {
        Self {
            floats,
            ..Self::default()
        }
    }

    /// Adds a float script to an integer script.
    #[must_use]
    pub fn with_floats(mut self, floats: Vec<f64>) -> Self {
        self.floats = floats;
        self
    }

    /// Number of float draws consumed so far.
    #[must_use]
    pub fn floats_drawn(&self) -> usize {
        self.float_index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val
    }

    fn next_f64(&mut self) -> f64 {
        let val = self.floats[self.float_index];
        self.float_index += 1;
        val
    }
}
