//! Time abstractions: wall-clock timestamps and discrete game turns.
//!
//! The engine advances in whole turns. Wall-clock time only stamps records
//! (choices, recovery attempts, events) so it is injected for determinism.

use chrono::{DateTime, Utc};

/// Index of a discrete game turn within a session.
pub type TurnNumber = u32;

/// Number of turns elapsed from `since` to `now`, saturating at zero when
/// `since` lies in the future.
#[must_use]
pub fn turns_elapsed(since: TurnNumber, now: TurnNumber) -> u32 {
    now.saturating_sub(since)
}

/// Abstraction over system time for deterministic record stamping.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_elapsed_counts_forward() {
        assert_eq!(turns_elapsed(3, 10), 7);
        assert_eq!(turns_elapsed(10, 10), 0);
    }

    #[test]
    fn test_turns_elapsed_saturates_for_future_turn() {
        assert_eq!(turns_elapsed(12, 4), 0);
    }
}
