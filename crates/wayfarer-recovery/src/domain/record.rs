//! Recovery records and resilience statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::time::TurnNumber;
use wayfarer_world_state::domain::snapshot::StoryState;

use super::failure::FailureCategory;

/// Immutable log entry for one recovery attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryRecord {
    /// Identifier.
    pub id: Uuid,
    /// Failure being recovered from.
    pub failure: FailureCategory,
    /// Remedy attempted.
    pub mechanic_id: String,
    /// Whether it worked.
    pub success: bool,
    /// What the player should take away.
    pub lessons: Vec<String>,
    /// How satisfying the attempt felt, in `[0, 100]`.
    pub satisfaction: f64,
    /// Turn of the attempt.
    pub turn: TurnNumber,
    /// When the record was written.
    pub recorded_at: DateTime<Utc>,
}

/// Result of a recovery attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryAttempt {
    /// Story state after cost and, on success, restoration.
    pub state: StoryState,
    /// Record to append to the history.
    pub record: RecoveryRecord,
    /// Human-readable effects.
    pub descriptions: Vec<String>,
}

/// Summary of how a player copes with failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResilienceStats {
    /// Share of successful attempts, in `[0, 100]`.
    pub resilience: f64,
    /// Mean satisfaction, in `[0, 100]`.
    pub adaptability: f64,
    /// `50 + 2 * (recent rate - overall rate)`, floored at zero and not
    /// capped above.
    pub learning_rate: f64,
    /// Attempts summarised.
    pub attempts: usize,
}

impl Default for ResilienceStats {
    fn default() -> Self {
        Self {
            resilience: 50.0,
            adaptability: 50.0,
            learning_rate: 50.0,
            attempts: 0,
        }
    }
}
