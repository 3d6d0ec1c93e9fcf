//! The story-state snapshot.

use serde::{Deserialize, Serialize};
use wayfarer_core::time::TurnNumber;

use super::character::Character;
use super::inventory::{EquippedItem, InventoryItem};
use super::npc::TrackedNpc;
use super::quest::{Quest, QuestStatus};
use super::standing::FactionStanding;

/// Everything the engine knows about the story at the start of a turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryState {
    /// Current turn.
    pub turn: TurnNumber,
    /// Where the character is.
    pub location: String,
    /// Every location the character has been to.
    pub visited_locations: Vec<String>,
    /// The player character.
    pub character: Character,
    /// Carried items.
    pub inventory: Vec<InventoryItem>,
    /// Worn and wielded gear.
    pub equipment: Vec<EquippedItem>,
    /// Known quests.
    pub quests: Vec<Quest>,
    /// Tracked NPCs.
    pub npcs: Vec<TrackedNpc>,
    /// Player reputation per faction.
    pub factions: Vec<FactionStanding>,
    /// Established facts about the world.
    pub world_facts: Vec<String>,
    /// Open narrative threads for the generator.
    pub narrative_threads: Vec<String>,
}

impl StoryState {
    /// Total quantity of an item across all stacks.
    #[must_use]
    pub fn item_quantity(&self, item_id: &str) -> u32 {
        self.inventory
            .iter()
            .filter(|i| i.id == item_id)
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Looks up a quest.
    #[must_use]
    pub fn quest(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    /// Looks up an NPC.
    #[must_use]
    pub fn npc(&self, npc_id: &str) -> Option<&TrackedNpc> {
        self.npcs.iter().find(|n| n.id == npc_id)
    }

    /// The tracked NPC, or a neutral stranger when not tracked.
    #[must_use]
    pub fn npc_or_stranger(&self, npc_id: &str) -> TrackedNpc {
        self.npc(npc_id)
            .cloned()
            .unwrap_or_else(|| TrackedNpc::stranger(npc_id))
    }

    /// Player standing with a faction; neutral when never recorded.
    #[must_use]
    pub fn standing(&self, faction_id: &str) -> FactionStanding {
        self.factions
            .iter()
            .find(|s| s.faction_id == faction_id)
            .cloned()
            .unwrap_or_else(|| FactionStanding::neutral(faction_id))
    }

    /// Whether a world fact is established.
    #[must_use]
    pub fn has_fact(&self, fact: &str) -> bool {
        self.world_facts.iter().any(|f| f == fact)
    }

    /// Whether the character has been to `location`.
    #[must_use]
    pub fn has_visited(&self, location: &str) -> bool {
        self.location == location || self.visited_locations.iter().any(|l| l == location)
    }

    /// Active quests.
    pub fn active_quests(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter().filter(|q| q.status == QuestStatus::Active)
    }

    /// Number of active quests flagged urgent.
    #[must_use]
    pub fn urgent_quest_count(&self) -> usize {
        self.active_quests().filter(|q| q.urgent).count()
    }

    /// Replaces (or appends) a quest by identifier.
    #[must_use]
    pub fn with_quest(mut self, quest: Quest) -> Self {
        match self.quests.iter_mut().find(|q| q.id == quest.id) {
            Some(slot) => *slot = quest,
            None => self.quests.push(quest),
        }
        self
    }

    /// Replaces (or appends) an NPC by identifier.
    #[must_use]
    pub fn with_npc(mut self, npc: TrackedNpc) -> Self {
        match self.npcs.iter_mut().find(|n| n.id == npc.id) {
            Some(slot) => *slot = npc,
            None => self.npcs.push(npc),
        }
        self
    }

    /// Replaces (or appends) a faction standing by faction identifier.
    #[must_use]
    pub fn with_standing(mut self, standing: FactionStanding) -> Self {
        match self
            .factions
            .iter_mut()
            .find(|s| s.faction_id == standing.faction_id)
        {
            Some(slot) => *slot = standing,
            None => self.factions.push(standing),
        }
        self
    }

    /// Adds items, stacking onto an existing stack when present.
    #[must_use]
    pub fn with_item_added(mut self, item_id: &str, name: &str, quantity: u32) -> Self {
        if quantity == 0 {
            return self;
        }
        match self.inventory.iter_mut().find(|i| i.id == item_id) {
            Some(stack) => stack.quantity = stack.quantity.saturating_add(quantity),
            None => self
                .inventory
                .push(InventoryItem::new(item_id, name, quantity)),
        }
        self
    }

    /// Removes up to `quantity` items; empty stacks are dropped.
    #[must_use]
    pub fn with_item_removed(mut self, item_id: &str, quantity: u32) -> Self {
        let mut remaining = quantity;
        for stack in self.inventory.iter_mut().filter(|i| i.id == item_id) {
            let taken = remaining.min(stack.quantity);
            stack.quantity -= taken;
            remaining -= taken;
            if remaining == 0 {
                break;
            }
        }
        self.inventory.retain(|i| i.quantity > 0);
        self
    }

    /// Moves the character, remembering the location as visited.
    #[must_use]
    pub fn with_location(mut self, location: &str) -> Self {
        if location.is_empty() || self.location == location {
            return self;
        }
        if !self.location.is_empty() && !self.visited_locations.contains(&self.location) {
            self.visited_locations.push(self.location.clone());
        }
        location.clone_into(&mut self.location);
        if !self.visited_locations.iter().any(|l| l == location) {
            self.visited_locations.push(location.to_owned());
        }
        self
    }
}
