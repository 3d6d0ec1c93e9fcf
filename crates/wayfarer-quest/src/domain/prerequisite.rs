//! Result of checking a quest's prerequisites.

use serde::{Deserialize, Serialize};
use wayfarer_world_state::domain::quest::QuestPrerequisite;

/// Outcome of [`validate_quest_prerequisites`].
///
/// [`validate_quest_prerequisites`]: crate::application::conditions::validate_quest_prerequisites
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteCheck {
    /// Whether the quest may start.
    pub met: bool,
    /// The first mandatory prerequisite that failed.
    pub blocking: Option<QuestPrerequisite>,
    /// Optional prerequisites that did not hold, up to the point of checking.
    pub unmet_optional: Vec<QuestPrerequisite>,
}
