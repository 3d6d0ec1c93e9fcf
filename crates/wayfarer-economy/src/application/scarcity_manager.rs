//! Scarcity manager.
//!
//! Derives live resource counts from the story state, fires and ages
//! scarcity events, and exposes the availability / cost / quality
//! modifiers they imply. The manager owns only its catalogue; active events
//! belong to the caller and flow in and out of every operation.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wayfarer_core::rng::{DeterministicRng, roll_chance};
use wayfarer_world_state::domain::snapshot::StoryState;

use crate::domain::catalog::{default_resources, default_scarcity_templates};
use crate::domain::resource::{ResourceSource, ResourceType, ScarcityAxis};
use crate::domain::scarcity::{
    ActiveScarcityEvent, ResourceWarning, ScarcityEventTemplate, ScarcityTick, ScarcityTrigger,
    WarningLevel,
};

/// Resource catalogue plus event templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScarcityManager {
    /// Tracked resource classes.
    pub resources: Vec<ResourceType>,
    /// Event templates.
    pub templates: Vec<ScarcityEventTemplate>,
    /// Global scale on baseline scarcity.
    pub scarcity_level: f64,
}

impl Default for ScarcityManager {
    fn default() -> Self {
        Self {
            resources: default_resources(),
            templates: default_scarcity_templates(),
            scarcity_level: 1.0,
        }
    }
}

impl ScarcityManager {
    /// The manager with a different global scarcity level.
    #[must_use]
    pub fn with_scarcity_level(mut self, level: f64) -> Self {
        self.scarcity_level = if level.is_nan() { 1.0 } else { level.max(0.0) };
        self
    }

    /// Looks up a resource class.
    #[must_use]
    pub fn resource(&self, resource_id: &str) -> Option<&ResourceType> {
        self.resources.iter().find(|r| r.id == resource_id)
    }

    /// Live count of a resource. Unknown resources count as zero.
    #[must_use]
    pub fn get_resource_count(&self, resource_id: &str, state: &StoryState) -> u32 {
        let Some(resource) = self.resource(resource_id) else {
            return 0;
        };
        match &resource.source {
            ResourceSource::Currency => u32::try_from(state.character.currency).unwrap_or(u32::MAX),
            ResourceSource::Items { item_ids } => item_ids
                .iter()
                .fold(0u32, |acc, id| acc.saturating_add(state.item_quantity(id))),
            ResourceSource::EquipmentCondition => {
                if state.equipment.is_empty() {
                    return 100;
                }
                let total: u32 = state.equipment.iter().map(|e| u32::from(e.condition)).sum();
                let count = u32::try_from(state.equipment.len()).unwrap_or(u32::MAX);
                total / count
            }
        }
    }

    /// Templates whose triggers all hold this turn and which are neither
    /// active nor already triggered by this call.
    ///
    /// Chance triggers are rolled last, and only once every deterministic
    /// trigger on the template holds.
    pub fn check_for_scarcity_events(
        &self,
        state: &StoryState,
        active: &[ActiveScarcityEvent],
        rng: &mut dyn DeterministicRng,
    ) -> Vec<ActiveScarcityEvent> {
        let mut triggered: Vec<ActiveScarcityEvent> = Vec::new();
        for template in &self.templates {
            let already = active.iter().any(|e| e.name == template.name)
                || triggered.iter().any(|e| e.name == template.name);
            if already || !self.deterministic_triggers_hold(template, state) {
                continue;
            }
            let lucky = template.triggers.iter().all(|trigger| match trigger {
                ScarcityTrigger::Chance { per_turn } => roll_chance(rng, *per_turn),
                _ => true,
            });
            if lucky {
                info!(
                    event = %template.name,
                    resource = %template.resource_id,
                    turn = state.turn,
                    "scarcity event triggered"
                );
                triggered.push(ActiveScarcityEvent::from_template(template, state.turn));
            }
        }
        triggered
    }

    fn deterministic_triggers_hold(&self, template: &ScarcityEventTemplate, state: &StoryState) -> bool {
        template.triggers.iter().all(|trigger| match trigger {
            ScarcityTrigger::ResourceBelow {
                resource_id,
                threshold,
            } => self.get_resource_count(resource_id, state) < *threshold,
            ScarcityTrigger::AtLocation { location } => state.location == *location,
            ScarcityTrigger::QuestActive { quest_id } => {
                state.quest(quest_id).is_some_and(|q| q.is_active())
            }
            ScarcityTrigger::Chance { .. } => true,
        })
    }

    /// Multiplies `base` by the resource's baseline scarcity and every
    /// active event on that resource for the given axis.
    #[must_use]
    pub fn apply_scarcity_effects(
        &self,
        base: f64,
        resource_id: &str,
        axis: ScarcityAxis,
        active: &[ActiveScarcityEvent],
    ) -> f64 {
        let baseline = self
            .resource(resource_id)
            .map_or(1.0, |r| r.baseline_multiplier(axis, self.scarcity_level));
        active
            .iter()
            .filter(|e| e.resource_id == resource_id)
            .fold(base * baseline, |value, e| value * e.effects.on(axis))
    }

    /// Price of `base_price` worth of a resource under current scarcity,
    /// rounded up.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn market_price(&self, base_price: u64, resource_id: &str, active: &[ActiveScarcityEvent]) -> u64 {
        let price = self.apply_scarcity_effects(base_price as f64, resource_id, ScarcityAxis::Cost, active);
        price.max(0.0).ceil() as u64
    }

    /// Every warning the narrative layer should mention, most urgent first.
    #[must_use]
    pub fn get_resource_warnings(
        &self,
        state: &StoryState,
        active: &[ActiveScarcityEvent],
    ) -> Vec<ResourceWarning> {
        let mut warnings: Vec<ResourceWarning> = self
            .resources
            .iter()
            .filter_map(|resource| {
                let count = self.get_resource_count(&resource.id, state);
                let threshold = resource.critical_threshold;
                let level = if count == 0 {
                    WarningLevel::Depleted
                } else if count <= threshold {
                    WarningLevel::Critical
                } else if count <= threshold.saturating_mul(2) {
                    WarningLevel::Low
                } else {
                    return None;
                };
                let events: Vec<&str> = active
                    .iter()
                    .filter(|e| e.resource_id == resource.id)
                    .map(|e| e.name.as_str())
                    .collect();
                let mut message = match level {
                    WarningLevel::Depleted => format!("{} are depleted", resource.name),
                    WarningLevel::Critical => {
                        format!("{} are critically low ({count} left)", resource.name)
                    }
                    WarningLevel::Low => format!("{} are running low ({count} left)", resource.name),
                };
                if !events.is_empty() {
                    message.push_str(&format!("; worsened by {}", events.join(", ")));
                }
                Some(ResourceWarning {
                    resource_id: resource.id.clone(),
                    count,
                    threshold,
                    level,
                    message,
                })
            })
            .collect();
        warnings.sort_by(|a, b| b.level.cmp(&a.level));
        warnings
    }
}

/// Merges newly triggered events into the active set, one per name.
#[must_use]
pub fn activate(
    active: &[ActiveScarcityEvent],
    triggered: &[ActiveScarcityEvent],
) -> Vec<ActiveScarcityEvent> {
    let mut next = active.to_vec();
    for event in triggered {
        if !next.iter().any(|e| e.name == event.name) {
            next.push(event.clone());
        }
    }
    next
}

/// Counts every active event down by `turns_passed` and evicts those that
/// reach zero.
#[must_use]
pub fn update_active_events(active: &[ActiveScarcityEvent], turns_passed: u32) -> ScarcityTick {
    let (remaining, expired): (Vec<_>, Vec<_>) = active
        .iter()
        .map(|e| ActiveScarcityEvent {
            remaining_turns: e.remaining_turns.saturating_sub(turns_passed),
            ..e.clone()
        })
        .partition(|e| e.remaining_turns > 0);
    for event in &expired {
        debug!(event = %event.name, "scarcity event expired");
    }
    ScarcityTick { remaining, expired }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_test_support::{MockRng, SequenceRng};
    use wayfarer_world_state::domain::inventory::{EquippedItem, InventoryItem};
    use wayfarer_world_state::domain::quest::{Quest, QuestStatus};

    fn broke_state() -> StoryState {
        StoryState {
            location: "Millbrook".to_owned(),
            inventory: vec![InventoryItem::new("rations", "Rations", 1)],
            ..StoryState::default()
        }
    }

    #[test]
    fn test_resource_counts_by_source() {
        let mut state = broke_state();
        state.character.currency = 75;
        state.inventory.push(InventoryItem::new("health_potion", "Potion", 2));
        state.inventory.push(InventoryItem::new("health_potions", "Potion", 1));
        state.equipment = vec![
            EquippedItem {
                id: "sword".to_owned(),
                name: "Sword".to_owned(),
                slot: "main_hand".to_owned(),
                condition: 60,
            },
            EquippedItem {
                id: "mail".to_owned(),
                name: "Mail".to_owned(),
                slot: "body".to_owned(),
                condition: 31,
            },
        ];

        let manager = ScarcityManager::default();
        assert_eq!(manager.get_resource_count("currency", &state), 75);
        assert_eq!(manager.get_resource_count("health_potions", &state), 3);
        assert_eq!(manager.get_resource_count("equipment_condition", &state), 45);
        assert_eq!(manager.get_resource_count("dragon_scales", &state), 0);
    }

    #[test]
    fn test_zero_health_potions_warns() {
        let manager = ScarcityManager::default();
        let warnings = manager.get_resource_warnings(&broke_state(), &[]);

        let potions = warnings
            .iter()
            .find(|w| w.resource_id == "health_potions")
            .expect("health potions warning");
        assert_eq!(potions.count, 0);
        assert_eq!(potions.threshold, 3);
        assert_eq!(potions.level, WarningLevel::Depleted);
    }

    #[test]
    fn test_warnings_sorted_and_mention_active_events() {
        let manager = ScarcityManager::default();
        let state = broke_state();
        let template = &manager.templates[1];
        let active = vec![ActiveScarcityEvent::from_template(template, 0)];

        let warnings = manager.get_resource_warnings(&state, &active);
        assert_eq!(warnings[0].level, WarningLevel::Depleted);
        let rations = warnings
            .iter()
            .find(|w| w.resource_id == "rations")
            .expect("rations warning");
        assert_eq!(rations.level, WarningLevel::Critical);
        assert!(rations.message.contains("Lean Harvest"));
    }

    #[test]
    fn test_check_twice_without_time_never_double_triggers() {
        let manager = ScarcityManager::default();
        let state = broke_state();

        let first = manager.check_for_scarcity_events(&state, &[], &mut MockRng);
        assert!(!first.is_empty());
        let active = activate(&[], &first);

        let second = manager.check_for_scarcity_events(&state, &active, &mut MockRng);
        assert!(second.is_empty());
        assert_eq!(activate(&active, &first).len(), active.len());
    }

    #[test]
    fn test_chance_trigger_rolled_only_after_deterministic_triggers() {
        let manager = ScarcityManager {
            templates: vec![manager_template_for_quest()],
            ..ScarcityManager::default()
        };
        let state = broke_state();
        let mut rng = SequenceRng::floats(vec![0.0]);

        let triggered = manager.check_for_scarcity_events(&state, &[], &mut rng);
        assert!(triggered.is_empty());
        assert_eq!(rng.floats_drawn(), 0);

        let mut quest = Quest::new("siege", "The Siege");
        quest.status = QuestStatus::Active;
        let state = state.with_quest(quest);
        let triggered = manager.check_for_scarcity_events(&state, &[], &mut rng);
        assert_eq!(triggered.len(), 1);
        assert_eq!(rng.floats_drawn(), 1);
    }

    fn manager_template_for_quest() -> ScarcityEventTemplate {
        ScarcityEventTemplate {
            name: "Siege Rationing".to_owned(),
            description: String::new(),
            resource_id: "rations".to_owned(),
            triggers: vec![
                ScarcityTrigger::QuestActive {
                    quest_id: "siege".to_owned(),
                },
                ScarcityTrigger::AtLocation {
                    location: "Millbrook".to_owned(),
                },
                ScarcityTrigger::Chance { per_turn: 0.5 },
            ],
            effects: crate::domain::scarcity::ScarcityEffects::default(),
            duration: 3,
            severity: crate::domain::scarcity::ScarcitySeverity::Severe,
        }
    }

    #[test]
    fn test_failed_chance_roll_does_not_trigger() {
        let manager = ScarcityManager::default();
        let mut rng = SequenceRng::floats(vec![0.99, 0.99]);
        let triggered = manager.check_for_scarcity_events(&broke_state(), &[], &mut rng);
        assert!(triggered.is_empty());
    }

    #[test]
    fn test_effects_multiply_baseline_and_events() {
        let manager = ScarcityManager::default();
        let template = &manager.templates[0];
        let active = vec![ActiveScarcityEvent::from_template(template, 0)];

        // health_potions: pressure = 0.4 * 1.0 * 0.95 = 0.38
        let cost = manager.apply_scarcity_effects(10.0, "health_potions", ScarcityAxis::Cost, &active);
        assert!((cost - 10.0 * 1.38 * 1.5).abs() < 1e-9);

        let other = manager.apply_scarcity_effects(10.0, "unknown", ScarcityAxis::Cost, &active);
        assert!((other - 10.0).abs() < 1e-9);

        assert_eq!(manager.market_price(10, "health_potions", &active), 21);
    }

    #[test]
    fn test_update_counts_down_and_evicts() {
        let manager = ScarcityManager::default();
        let active: Vec<_> = manager
            .templates
            .iter()
            .map(|t| ActiveScarcityEvent::from_template(t, 0))
            .collect();

        let tick = update_active_events(&active, 4);
        assert_eq!(tick.expired.len(), 1);
        assert_eq!(tick.expired[0].name, "Blacksmith Backlog");
        assert_eq!(tick.remaining.len(), 2);
        assert_eq!(tick.remaining[0].remaining_turns, 1);

        let tick = update_active_events(&tick.remaining, u32::MAX);
        assert!(tick.remaining.is_empty());
        assert_eq!(tick.expired.len(), 2);
    }

    #[test]
    fn test_update_with_zero_turns_keeps_everything() {
        let manager = ScarcityManager::default();
        let active = vec![ActiveScarcityEvent::from_template(&manager.templates[0], 2)];
        let tick = update_active_events(&active, 0);
        assert_eq!(tick.remaining, active);
        assert!(tick.expired.is_empty());
    }
}
