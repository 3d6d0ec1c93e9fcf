//! Directed faction relationship graph.
//!
//! Edges are directed: how the guild sees the crown is independent of how
//! the crown sees the guild. Every operation takes the current factions and
//! returns the next version of them.

use std::collections::BTreeMap;

use tracing::{debug, info};
use uuid::Uuid;
use wayfarer_core::bounds::clamp_score;
use wayfarer_core::error::DomainError;
use wayfarer_core::time::TurnNumber;
use wayfarer_world_state::domain::standing::FactionStanding;

use crate::domain::effect::ConsequenceEffect;
use crate::domain::faction::{
    ConflictResolution, Faction, FactionConflict, GOAL_COMPLETION_POWER, PoliticalInfluence,
    PowerShift,
};

/// Edge change when a conflict breaks out.
pub const CONFLICT_RELATIONSHIP_DELTA: i32 = -30;
/// Edge change when a conflict is settled.
pub const RESOLUTION_RELATIONSHIP_DELTA: i32 = 20;
/// Edge score at or above which a faction counts as an ally for ripples.
pub const RIPPLE_ALLY_THRESHOLD: i32 = 25;
/// Edge score at or below which a faction counts as a rival for ripples.
pub const RIPPLE_RIVAL_THRESHOLD: i32 = -25;

fn require<'a>(factions: &'a [Faction], faction_id: &str) -> Result<&'a Faction, DomainError> {
    factions
        .iter()
        .find(|f| f.id == faction_id)
        .ok_or_else(|| DomainError::UnknownFaction(faction_id.to_owned()))
}

/// Moves `source`'s view of `target`. An unknown source leaves the factions
/// untouched.
#[must_use]
pub fn update_faction_relationship(
    source: &str,
    target: &str,
    delta: i32,
    reason: &str,
    turn: TurnNumber,
    factions: &[Faction],
) -> Vec<Faction> {
    if !factions.iter().any(|f| f.id == source) {
        debug!(source, target, "relationship update for unknown faction ignored");
        return factions.to_vec();
    }
    factions
        .iter()
        .map(|f| {
            if f.id == source {
                let edge = f.relationship(target).with_delta(delta, reason, turn);
                debug!(source, target, score = edge.score, label = ?edge.label, "edge updated");
                f.clone().with_relationship(edge)
            } else {
                f.clone()
            }
        })
        .collect()
}

fn apply_power_shifts(factions: Vec<Faction>, shifts: &[PowerShift]) -> Vec<Faction> {
    factions
        .into_iter()
        .map(|f| {
            let delta: f64 = shifts
                .iter()
                .filter(|s| s.faction_id() == f.id)
                .map(PowerShift::delta)
                .sum();
            if delta.abs() < f64::EPSILON {
                f
            } else {
                f.with_power_delta(delta)
            }
        })
        .collect()
}

fn shift_both_edges(
    a: &str,
    b: &str,
    delta: i32,
    reason: &str,
    turn: TurnNumber,
    factions: &[Faction],
) -> Vec<Faction> {
    let factions = update_faction_relationship(a, b, delta, reason, turn, factions);
    update_faction_relationship(b, a, delta, reason, turn, &factions)
}

/// Opens a conflict: both edges sour and the listed power shifts apply.
///
/// # Errors
///
/// Returns `DomainError::UnknownFaction` if either party is unknown.
pub fn create_faction_conflict(
    faction_a: &str,
    faction_b: &str,
    description: &str,
    consequences: Vec<PowerShift>,
    turn: TurnNumber,
    factions: &[Faction],
) -> Result<(Vec<Faction>, FactionConflict), DomainError> {
    require(factions, faction_a)?;
    require(factions, faction_b)?;

    let next = shift_both_edges(
        faction_a,
        faction_b,
        CONFLICT_RELATIONSHIP_DELTA,
        description,
        turn,
        factions,
    );
    let next = apply_power_shifts(next, &consequences);
    let conflict = FactionConflict {
        id: Uuid::new_v4(),
        faction_a: faction_a.to_owned(),
        faction_b: faction_b.to_owned(),
        description: description.to_owned(),
        consequences,
        started_turn: turn,
        resolution: None,
        resolved_turn: None,
    };
    info!(conflict_id = %conflict.id, faction_a, faction_b, turn, "faction conflict opened");
    Ok((next, conflict))
}

/// Settles a conflict: both edges recover and the resolution's power shifts
/// apply.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the conflict is already settled and
/// `DomainError::UnknownFaction` if a party no longer exists.
pub fn resolve_faction_conflict(
    conflict: &FactionConflict,
    resolution: ConflictResolution,
    turn: TurnNumber,
    factions: &[Faction],
) -> Result<(Vec<Faction>, FactionConflict), DomainError> {
    if conflict.is_resolved() {
        return Err(DomainError::Validation(format!(
            "conflict {} is already resolved",
            conflict.id
        )));
    }
    require(factions, &conflict.faction_a)?;
    require(factions, &conflict.faction_b)?;

    let next = shift_both_edges(
        &conflict.faction_a,
        &conflict.faction_b,
        RESOLUTION_RELATIONSHIP_DELTA,
        &resolution.description,
        turn,
        factions,
    );
    let next = apply_power_shifts(next, &resolution.consequences);
    let settled = FactionConflict {
        resolution: Some(resolution),
        resolved_turn: Some(turn),
        ..conflict.clone()
    };
    info!(conflict_id = %conflict.id, turn, "faction conflict resolved");
    Ok((next, settled))
}

/// Aggregates power shares, stability and the player's weighted standing.
#[must_use]
pub fn calculate_political_influence(
    factions: &[Faction],
    standings: &[FactionStanding],
) -> PoliticalInfluence {
    let weights: Vec<(&str, f64)> = factions
        .iter()
        .map(|f| (f.id.as_str(), (f.influence.political * f.power_level).max(0.0)))
        .collect();
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return PoliticalInfluence::default();
    }

    let shares: BTreeMap<String, f64> = weights
        .iter()
        .map(|(id, w)| ((*id).to_owned(), w / total))
        .collect();
    let max = shares.values().copied().fold(f64::MIN, f64::max);
    let min = shares.values().copied().fold(f64::MAX, f64::min);
    let stability = clamp_score((1.0 - (max - min)) * 100.0);
    let player_influence = shares
        .iter()
        .map(|(id, share)| {
            let reputation = standings
                .iter()
                .find(|s| &s.faction_id == id)
                .map_or(0, |s| s.reputation);
            f64::from(reputation) * share
        })
        .sum::<f64>()
        .clamp(-100.0, 100.0);
    let dominant_faction = shares
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(id, _)| id.clone());

    PoliticalInfluence {
        shares,
        stability,
        player_influence,
        dominant_faction,
    }
}

/// Moves a faction goal forward; completing it grants power once.
///
/// # Errors
///
/// Returns `DomainError::UnknownFaction` for an unknown faction and
/// `DomainError::Validation` for an unknown goal.
pub fn advance_faction_goal(
    faction_id: &str,
    goal_id: &str,
    delta: f64,
    factions: &[Faction],
) -> Result<Vec<Faction>, DomainError> {
    let faction = require(factions, faction_id)?;
    let mut updated = faction.clone();
    let goal = updated
        .goals
        .iter_mut()
        .find(|g| g.id == goal_id)
        .ok_or_else(|| {
            DomainError::Validation(format!("faction {faction_id} has no goal {goal_id}"))
        })?;

    goal.progress = clamp_score(goal.progress + delta);
    let newly_completed = !goal.completed && goal.progress >= 100.0;
    if newly_completed {
        goal.completed = true;
        info!(faction_id, goal_id, "faction goal completed");
        updated = updated.with_power_delta(GOAL_COMPLETION_POWER);
    }

    Ok(factions
        .iter()
        .map(|f| if f.id == faction_id { updated.clone() } else { f.clone() })
        .collect())
}

/// Standing effects that spread from a change with one faction to the
/// factions it has strong views about: half the delta to allies and the
/// inverse half to rivals.
#[must_use]
pub fn ripple_standing_change(
    faction_id: &str,
    delta: i32,
    factions: &[Faction],
) -> Vec<ConsequenceEffect> {
    let Some(origin) = factions.iter().find(|f| f.id == faction_id) else {
        return Vec::new();
    };
    let half = delta / 2;
    if half == 0 {
        return Vec::new();
    }
    origin
        .relationships
        .iter()
        .filter(|edge| edge.target_id != faction_id)
        .filter_map(|edge| {
            let rippled = if edge.score >= RIPPLE_ALLY_THRESHOLD {
                half
            } else if edge.score <= RIPPLE_RIVAL_THRESHOLD {
                half.saturating_neg()
            } else {
                return None;
            };
            Some(ConsequenceEffect::FactionDelta {
                faction_id: edge.target_id.clone(),
                delta: rippled,
            })
        })
        .collect()
}
