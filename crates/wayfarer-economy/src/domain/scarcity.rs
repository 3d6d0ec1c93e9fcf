//! Scarcity event templates and active events.

use serde::{Deserialize, Serialize};
use wayfarer_core::time::TurnNumber;

use super::resource::ScarcityAxis;

/// A condition that must hold for a scarcity event to fire. Every trigger
/// on a template must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScarcityTrigger {
    /// The resource's live count is strictly below `threshold`.
    ResourceBelow {
        /// Resource to count.
        resource_id: String,
        /// Exclusive upper bound.
        threshold: u32,
    },
    /// The character is at `location`.
    AtLocation {
        /// Location name.
        location: String,
    },
    /// The quest is active.
    QuestActive {
        /// Quest identifier.
        quest_id: String,
    },
    /// Fires with probability `per_turn` each time it is evaluated.
    Chance {
        /// Probability in `[0, 1]`.
        per_turn: f64,
    },
}

/// Multipliers an event applies while active. `1.0` is no effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScarcityEffects {
    /// Availability multiplier.
    pub availability: f64,
    /// Cost multiplier.
    pub cost: f64,
    /// Quality multiplier.
    pub quality: f64,
}

impl Default for ScarcityEffects {
    fn default() -> Self {
        Self {
            availability: 1.0,
            cost: 1.0,
            quality: 1.0,
        }
    }
}

impl ScarcityEffects {
    /// The multiplier for one axis.
    #[must_use]
    pub fn on(&self, axis: ScarcityAxis) -> f64 {
        match axis {
            ScarcityAxis::Availability => self.availability,
            ScarcityAxis::Cost => self.cost,
            ScarcityAxis::Quality => self.quality,
        }
    }
}

/// How hard an event bites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarcitySeverity {
    /// Barely noticeable.
    Minor,
    /// Noticeable.
    #[default]
    Moderate,
    /// Forces changes in plans.
    Severe,
    /// Threatens survival.
    Critical,
}

/// A catalogue entry describing when an event fires and what it does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScarcityEventTemplate {
    /// Unique name; at most one event per name is active.
    pub name: String,
    /// Narrative description.
    #[serde(default)]
    pub description: String,
    /// Resource the effects apply to.
    pub resource_id: String,
    /// Conditions that must all hold.
    #[serde(default)]
    pub triggers: Vec<ScarcityTrigger>,
    /// Multipliers while active.
    #[serde(default)]
    pub effects: ScarcityEffects,
    /// Turns the event lasts.
    pub duration: u32,
    /// Severity.
    #[serde(default)]
    pub severity: ScarcitySeverity,
}

/// A scarcity event in force.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveScarcityEvent {
    /// Template name.
    pub name: String,
    /// Narrative description.
    pub description: String,
    /// Resource the effects apply to.
    pub resource_id: String,
    /// Multipliers while active.
    pub effects: ScarcityEffects,
    /// Turns left; the event is evicted when this reaches zero.
    pub remaining_turns: u32,
    /// Severity.
    pub severity: ScarcitySeverity,
    /// Turn the event fired.
    pub started_turn: TurnNumber,
}

impl ActiveScarcityEvent {
    /// Instantiates a template at `turn`.
    #[must_use]
    pub fn from_template(template: &ScarcityEventTemplate, turn: TurnNumber) -> Self {
        Self {
            name: template.name.clone(),
            description: template.description.clone(),
            resource_id: template.resource_id.clone(),
            effects: template.effects,
            remaining_turns: template.duration.max(1),
            severity: template.severity,
            started_turn: turn,
        }
    }
}

/// Result of ageing the active events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScarcityTick {
    /// Events still in force.
    pub remaining: Vec<ActiveScarcityEvent>,
    /// Events that ran out this tick.
    pub expired: Vec<ActiveScarcityEvent>,
}

/// How urgent a resource warning is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    /// At or below twice the critical threshold.
    Low,
    /// At or below the critical threshold.
    Critical,
    /// None left.
    Depleted,
}

/// A resource running short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceWarning {
    /// Resource identifier.
    pub resource_id: String,
    /// Live count.
    pub count: u32,
    /// The resource's critical threshold.
    pub threshold: u32,
    /// Urgency.
    pub level: WarningLevel,
    /// Message for the narrative layer.
    pub message: String,
}

/// Global scarcity tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScarcitySettings {
    /// Global scale on every resource's baseline scarcity.
    pub scarcity_level: f64,
    /// Whether the difficulty profile's `resource_scarcity` axis scales the
    /// global level.
    pub follow_difficulty: bool,
}

impl Default for ScarcitySettings {
    fn default() -> Self {
        Self {
            scarcity_level: 1.0,
            follow_difficulty: true,
        }
    }
}
