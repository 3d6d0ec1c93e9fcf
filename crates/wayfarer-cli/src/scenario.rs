//! Scenario files.
//!
//! A scenario seeds one session: the story state at turn zero, the faction
//! graph, and the turn inputs the narrative generator would have produced.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use wayfarer_consequence::application::faction_graph::update_faction_relationship;
use wayfarer_consequence::domain::faction::Faction;
use wayfarer_core::error::DomainError;
use wayfarer_engine::domain::report::TurnInput;
use wayfarer_engine::domain::world::World;
use wayfarer_world_state::domain::snapshot::StoryState;

use crate::error::CliError;

/// One faction's opinion of another at the start of the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRelationship {
    /// Faction holding the opinion.
    pub source: String,
    /// Faction the opinion is about.
    pub target: String,
    /// Starting score, clamped to `[-100, 100]`.
    pub score: i32,
}

/// A playable scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Session to run under; a fresh one when absent.
    pub session_id: Option<Uuid>,
    /// Story state at turn zero.
    pub state: StoryState,
    /// Faction graph.
    pub factions: Vec<Faction>,
    /// Starting faction opinions.
    pub relationships: Vec<ScenarioRelationship>,
    /// Turns to play, in order.
    pub turns: Vec<TurnInput>,
}

impl Scenario {
    /// Parses a scenario from YAML.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Yaml` if the document is not a scenario.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CliError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads a scenario file.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` if the file cannot be read and `CliError::Yaml`
    /// if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let scenario = Self::from_yaml_str(&yaml)?;
        info!(
            path = %path.display(),
            factions = scenario.factions.len(),
            turns = scenario.turns.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }

    /// Splits the scenario into the starting world and the turns to play.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownFaction` if a relationship names a
    /// faction the scenario does not declare.
    pub fn into_world(self) -> Result<(World, Vec<TurnInput>), DomainError> {
        let mut factions = self.factions;
        for edge in &self.relationships {
            for id in [&edge.source, &edge.target] {
                if !factions.iter().any(|f| &f.id == id) {
                    return Err(DomainError::UnknownFaction(id.clone()));
                }
            }
            factions = update_faction_relationship(
                &edge.source,
                &edge.target,
                edge.score,
                "scenario",
                self.state.turn,
                &factions,
            );
        }
        Ok((World::new(self.state).with_factions(factions), self.turns))
    }
}
