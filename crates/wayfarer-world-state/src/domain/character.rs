//! The player character.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wayfarer_core::bounds::clamp_score;

/// Stat names the engine routes to dedicated character fields instead of
/// the free-form `stats` map.
pub const HEALTH: &str = "health";
/// See [`HEALTH`].
pub const STRESS: &str = "stress";
/// See [`HEALTH`].
pub const CURRENCY: &str = "currency";
/// See [`HEALTH`].
pub const EXPERIENCE: &str = "experience";

/// The player character as described by the story snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    /// Display name.
    pub name: String,
    /// Character level (1-based).
    pub level: u32,
    /// Current hit points.
    pub health: i32,
    /// Maximum hit points.
    pub max_health: i32,
    /// Accumulated stress in `[0, 100]`.
    pub stress: i32,
    /// Coin on hand.
    pub currency: u64,
    /// Total experience earned.
    pub experience: u64,
    /// Attribute scores (strength, wits, ...).
    pub stats: BTreeMap<String, i32>,
    /// Trained skill ranks.
    pub skills: BTreeMap<String, i32>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: "Wanderer".to_owned(),
            level: 1,
            health: 100,
            max_health: 100,
            stress: 0,
            currency: 0,
            experience: 0,
            stats: BTreeMap::new(),
            skills: BTreeMap::new(),
        }
    }
}

impl Character {
    /// Creates a character at full health with no stats.
    #[must_use]
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level: level.max(1),
            ..Self::default()
        }
    }

    /// Whether the character is still standing.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Current health as a fraction of maximum, in `[0, 1]`.
    #[must_use]
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (f64::from(self.health) / f64::from(self.max_health)).clamp(0.0, 1.0)
    }

    /// Attribute score, zero when absent.
    #[must_use]
    pub fn stat(&self, name: &str) -> i32 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    /// Current value of any stat `with_stat_delta` accepts, routed the same
    /// way.
    #[must_use]
    pub fn stat_value(&self, stat: &str) -> i64 {
        match stat {
            HEALTH => i64::from(self.health),
            STRESS => i64::from(self.stress),
            CURRENCY => i64::try_from(self.currency).unwrap_or(i64::MAX),
            EXPERIENCE => i64::try_from(self.experience).unwrap_or(i64::MAX),
            other => i64::from(self.stat(other)),
        }
    }

    /// Skill rank, zero when absent.
    #[must_use]
    pub fn skill(&self, name: &str) -> i32 {
        self.skills.get(name).copied().unwrap_or(0)
    }

    /// Applies a signed delta to a named stat.
    ///
    /// `health`, `stress`, `currency` and `experience` are routed to their
    /// dedicated fields and kept within their ranges; anything else lands in
    /// the `stats` map.
    #[must_use]
    pub fn with_stat_delta(mut self, stat: &str, delta: i32) -> Self {
        match stat {
            HEALTH => {
                self.health = self
                    .health
                    .saturating_add(delta)
                    .clamp(0, self.max_health.max(0));
            }
            STRESS => {
                self.stress = self.stress.saturating_add(delta).clamp(0, 100);
            }
            CURRENCY => {
                self.currency = self.currency.saturating_add_signed(i64::from(delta));
            }
            EXPERIENCE => {
                self.experience = self.experience.saturating_add_signed(i64::from(delta));
            }
            other => {
                let entry = self.stats.entry(other.to_owned()).or_insert(0);
                *entry = entry.saturating_add(delta);
            }
        }
        self
    }

    /// Stress expressed as a `[0, 100]` score.
    #[must_use]
    pub fn stress_score(&self) -> f64 {
        clamp_score(f64::from(self.stress))
    }
}
