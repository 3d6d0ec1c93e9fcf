//! Moral alignment tracking.

use tracing::info;
use wayfarer_core::bounds::clamp_score;
use wayfarer_core::time::TurnNumber;

use crate::domain::choice::PlayerChoice;
use crate::domain::moral::{MoralEvent, MoralProfile};

/// Accumulated pressure needed before the alignment takes a step.
pub const ALIGNMENT_STEP_PRESSURE: f64 = 3.0;
/// Number of recent events consistency looks back over.
pub const CONSISTENCY_WINDOW: usize = 10;
/// Consistency lost per alignment change in the window.
pub const CONSISTENCY_PENALTY: f64 = 15.0;

/// Folds a choice into the moral profile.
///
/// The tag's base shift is scaled by the choice difficulty and accumulated as
/// pressure. Once the pressure reaches a full step in either direction the
/// alignment moves to the adjacent compass point and the pressure resets.
#[must_use]
pub fn update_moral_profile(
    choice: &PlayerChoice,
    profile: &MoralProfile,
    turn: TurnNumber,
) -> MoralProfile {
    let shift = choice.moral_tag.alignment_shift() * (1.0 + f64::from(choice.difficulty) / 100.0);
    let from = profile.alignment;
    let mut pressure = profile.pressure + shift;

    let to = if pressure >= ALIGNMENT_STEP_PRESSURE {
        from.toward_good()
    } else if pressure <= -ALIGNMENT_STEP_PRESSURE {
        from.toward_evil()
    } else {
        from
    };
    if pressure.abs() >= ALIGNMENT_STEP_PRESSURE {
        pressure = 0.0;
    }

    let mut history = profile.history.clone();
    history.push(MoralEvent {
        turn,
        choice_id: choice.id,
        tag: choice.moral_tag,
        shift,
        from,
        to,
    });
    let consistency = consistency_of(&history);

    if from != to {
        info!(choice_id = %choice.id, turn, ?from, ?to, "alignment shifted");
    }
    MoralProfile {
        alignment: to,
        history,
        consistency,
        pressure,
    }
}

#[allow(clippy::cast_precision_loss)]
fn consistency_of(history: &[MoralEvent]) -> f64 {
    let changes = history
        .iter()
        .rev()
        .take(CONSISTENCY_WINDOW)
        .filter(|e| e.changed_alignment())
        .count();
    clamp_score(100.0 - CONSISTENCY_PENALTY * changes as f64)
}
