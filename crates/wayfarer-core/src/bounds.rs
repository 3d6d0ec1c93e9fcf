//! Bounded-score helpers.
//!
//! Scores in the engine live on fixed ranges. Values are clamped where they
//! are computed; leaving a range is never an error.

/// Lower bound of percentage-style scores.
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound of percentage-style scores.
pub const SCORE_MAX: f64 = 100.0;
/// Lower bound of relationship and reputation scores.
pub const RELATION_MIN: i32 = -100;
/// Upper bound of relationship and reputation scores.
pub const RELATION_MAX: i32 = 100;

/// Clamps a percentage-style score to `[0, 100]`. `NaN` collapses to zero.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return SCORE_MIN;
    }
    value.clamp(SCORE_MIN, SCORE_MAX)
}

/// Clamps a relationship score to `[-100, 100]`.
#[must_use]
pub fn clamp_relation(value: i32) -> i32 {
    value.clamp(RELATION_MIN, RELATION_MAX)
}

/// Adds `delta` to a relationship score without overflow and clamps it.
#[must_use]
pub fn shift_relation(current: i32, delta: i32) -> i32 {
    clamp_relation(current.saturating_add(delta))
}

/// Exponential moving average step: `old + alpha * (input - old)`.
///
/// The input is clamped to `[0, 100]` before blending and the result is
/// clamped again so rounding can never escape the range.
#[must_use]
pub fn blend(old: f64, input: f64, alpha: f64) -> f64 {
    let alpha = alpha.clamp(0.0, 1.0);
    clamp_score(old + alpha * (clamp_score(input) - old))
}

/// Appends `item` to `history`, dropping the oldest entries beyond `cap`.
#[must_use]
pub fn push_capped<T: Clone>(history: &[T], item: T, cap: usize) -> Vec<T> {
    let mut next: Vec<T> = history.to_vec();
    next.push(item);
    if next.len() > cap {
        let excess = next.len() - cap;
        next.drain(..excess);
    }
    next
}
