//! Trackable resource classes.

use serde::{Deserialize, Serialize};
use wayfarer_core::bounds::clamp_score;

/// Where a resource's live count comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSource {
    /// The character's purse.
    Currency,
    /// Summed quantities of the listed inventory items.
    Items {
        /// Inventory item identifiers that count toward this resource.
        item_ids: Vec<String>,
    },
    /// Mean condition of equipped items.
    EquipmentCondition,
}

/// Axis a scarcity modifier acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarcityAxis {
    /// How easy the resource is to find; lower is scarcer.
    Availability,
    /// What the resource costs; higher is dearer.
    Cost,
    /// How good found units are; lower is worse.
    Quality,
}

/// A scarce resource class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceType {
    /// Identifier, e.g. `health_potions`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Baseline scarcity in `[0, 100]`.
    #[serde(default)]
    pub base_scarcity: f64,
    /// Count at or below which the resource is critical.
    #[serde(default)]
    pub critical_threshold: u32,
    /// Share of the resource that replenishes naturally, in `[0, 1]`.
    #[serde(default)]
    pub renewal_rate: f64,
    /// Where the count comes from.
    pub source: ResourceSource,
}

impl ResourceType {
    /// Builds a resource type with its bounds enforced.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source: ResourceSource,
        base_scarcity: f64,
        critical_threshold: u32,
        renewal_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_scarcity,
            critical_threshold,
            renewal_rate,
            source,
        }
        .clamped()
    }

    /// Returns the resource with `base_scarcity` and `renewal_rate` pulled
    /// into range.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.base_scarcity = clamp_score(self.base_scarcity);
        self.renewal_rate = if self.renewal_rate.is_nan() {
            0.0
        } else {
            self.renewal_rate.clamp(0.0, 1.0)
        };
        self
    }

    /// Implicit multiplier on `axis` from this resource's baseline scarcity
    /// and the global scarcity level.
    ///
    /// Pressure is `base_scarcity / 100 * level * (1 - renewal_rate / 2)`;
    /// availability falls by half the pressure, cost rises by the full
    /// pressure and quality falls by a quarter of it.
    #[must_use]
    pub fn baseline_multiplier(&self, axis: ScarcityAxis, scarcity_level: f64) -> f64 {
        let level = if scarcity_level.is_nan() {
            1.0
        } else {
            scarcity_level.max(0.0)
        };
        let pressure = self.base_scarcity / 100.0 * level * (1.0 - self.renewal_rate / 2.0);
        match axis {
            ScarcityAxis::Availability => (1.0 - pressure * 0.5).max(0.1),
            ScarcityAxis::Cost => 1.0 + pressure,
            ScarcityAxis::Quality => (1.0 - pressure * 0.25).max(0.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_bounds() {
        let resource = ResourceType::new("ore", "Ore", ResourceSource::Currency, 180.0, 2, -3.0);
        assert!((resource.base_scarcity - 100.0).abs() < f64::EPSILON);
        assert!(resource.renewal_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_baseline_is_neutral_without_scarcity() {
        let resource = ResourceType::new("ore", "Ore", ResourceSource::Currency, 0.0, 2, 0.5);
        for axis in [
            ScarcityAxis::Availability,
            ScarcityAxis::Cost,
            ScarcityAxis::Quality,
        ] {
            assert!((resource.baseline_multiplier(axis, 1.0) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_renewal_softens_cost_pressure() {
        let scarce = ResourceType::new("ore", "Ore", ResourceSource::Currency, 40.0, 2, 0.0);
        let renewing = ResourceType::new("ore", "Ore", ResourceSource::Currency, 40.0, 2, 1.0);
        assert!((scarce.baseline_multiplier(ScarcityAxis::Cost, 1.0) - 1.4).abs() < 1e-9);
        assert!((renewing.baseline_multiplier(ScarcityAxis::Cost, 1.0) - 1.2).abs() < 1e-9);
    }
}
