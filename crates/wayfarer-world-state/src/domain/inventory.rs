//! Carried and equipped items.

use serde::{Deserialize, Serialize};

/// Broad item classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Potions, food, ammunition.
    Consumable,
    /// Crafting inputs.
    Material,
    /// Quest-bound items.
    Quest,
    /// Trade goods and gems.
    Valuable,
    /// Anything else.
    #[default]
    Misc,
}

/// A stack of items in the character's pack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    /// Stable item identifier (e.g. `health_potion`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Item class.
    pub category: ItemCategory,
    /// Stack size.
    pub quantity: u32,
}

impl InventoryItem {
    /// Creates a stack of `quantity` items.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: ItemCategory::Misc,
            quantity,
        }
    }

    /// Sets the item category.
    #[must_use]
    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }
}

/// A piece of gear currently worn or wielded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquippedItem {
    /// Stable item identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Equipment slot (weapon, armor, ...).
    pub slot: String,
    /// Durability in `[0, 100]`.
    pub condition: u8,
}

impl Default for EquippedItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            slot: String::new(),
            condition: 100,
        }
    }
}
