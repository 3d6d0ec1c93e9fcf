//! Consequences waiting to manifest.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfarer_core::time::TurnNumber;

use super::effect::Consequence;

/// A delayed consequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingConsequence {
    /// Choice the consequence belongs to.
    pub choice_id: Uuid,
    /// The consequence.
    pub consequence: Consequence,
    /// Turn on or after which it manifests.
    pub due_turn: TurnNumber,
}

impl PendingConsequence {
    /// Schedules `consequence` `delay_turns` after `turn`.
    #[must_use]
    pub fn schedule(choice_id: Uuid, consequence: Consequence, turn: TurnNumber) -> Self {
        let due_turn = turn.saturating_add(consequence.delay_turns);
        Self {
            choice_id,
            consequence,
            due_turn,
        }
    }
}

/// Splits the queue into consequences due at `turn` and those still
/// waiting, both in scheduling order.
#[must_use]
pub fn split_due(
    pending: &[PendingConsequence],
    turn: TurnNumber,
) -> (Vec<PendingConsequence>, Vec<PendingConsequence>) {
    pending.iter().cloned().partition(|p| p.due_turn <= turn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_due_keeps_future_consequences() {
        let choice_id = Uuid::new_v4();
        let mut soon = Consequence::new("soon", Vec::new());
        soon.delay_turns = 1;
        let mut later = Consequence::new("later", Vec::new());
        later.delay_turns = 5;

        let queue = vec![
            PendingConsequence::schedule(choice_id, later, 10),
            PendingConsequence::schedule(choice_id, soon, 10),
        ];
        let (due, waiting) = split_due(&queue, 11);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].consequence.id, "soon");
        assert_eq!(waiting[0].due_turn, 15);
    }
}
