//! Turn coordinator.
//!
//! Owns one session's [`World`] and runs every subsystem over it in a fixed
//! order. A turn is computed on a copy of the world and committed only when
//! every step succeeds, so a rejected turn leaves nothing half-applied.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;
use wayfarer_consequence::application::faction_graph::{
    calculate_political_influence, create_faction_conflict, resolve_faction_conflict,
    ripple_standing_change,
};
use wayfarer_consequence::application::moral_compass::update_moral_profile;
use wayfarer_consequence::application::propagator::{
    manifest_consequence, record_player_choice, revert_consequence,
};
use wayfarer_consequence::domain::choice::ManifestOutcome;
use wayfarer_consequence::domain::effect::{Consequence, ConsequenceCategory, ConsequenceEffect};
use wayfarer_consequence::domain::faction::FactionConflict;
use wayfarer_consequence::domain::pending::{PendingConsequence, split_due};
use wayfarer_core::error::DomainError;
use wayfarer_core::event::EventMetadata;
use wayfarer_core::rng::DeterministicRng;
use wayfarer_core::time::{Clock, TurnNumber};
use wayfarer_economy::application::risk_reward_engine::{RiskRewardEngine, settle_investment};
use wayfarer_economy::application::scarcity_manager::{
    ScarcityManager, activate, update_active_events,
};
use wayfarer_economy::domain::investment::{Investment, InvestmentReturn};
use wayfarer_economy::domain::reward::ScaledReward;
use wayfarer_economy::domain::tradeoff::{TradeoffMechanic, TradeoffOutcome};
use wayfarer_performance::application::difficulty_calculator::compute_difficulty;
use wayfarer_performance::application::tracker::{
    observe_turn, record_combat_outcome, record_quest_outcome, record_resource_action,
};
use wayfarer_performance::domain::metrics::CombatReport;
use wayfarer_quest::application::state_machine::{
    check_quest_failure_conditions, complete_quest, create_quest_failure_record, fail_quest,
    get_available_quest_branches, reactivate_quest, select_quest_branch, start_quest,
};
use wayfarer_quest::domain::failure::QuestFailureKind;
use wayfarer_recovery::application::recovery_system::{
    FailureRecoverySystem, calculate_player_resilience, detect_failure,
};
use wayfarer_recovery::domain::record::{RecoveryAttempt, ResilienceStats};
use wayfarer_world_state::domain::moral::MoralTag;
use wayfarer_world_state::domain::quest::Quest;
use wayfarer_world_state::domain::snapshot::StoryState;

use crate::config::EngineSettings;
use crate::domain::commands::{
    AttemptRecovery, CompleteQuest, CreateFactionConflict, ExecuteTradeoff, OpenInvestment,
    ProcessTurn, ReactivateQuest, ResolveFactionConflict, ResolveInvestment, RevertConsequence,
    SelectQuestBranch, StartQuest,
};
use crate::domain::events::{
    AlignmentShifted, ChoiceRecorded, ConsequenceManifested, ConsequenceReverted,
    ConsequenceScheduled, EngineEvent, EngineEventKind, FactionConflictResolved,
    FactionConflictStarted, FailureDetected, InvestmentOpened, InvestmentResolved,
    QuestBranchSelected, QuestFailed, QuestTransition, RecoveryAttempted, RewardGranted,
    ScarcityEnded, ScarcityStarted, TradeoffExecuted, TurnProcessed,
};
use crate::domain::report::TurnReport;
use crate::domain::world::World;

/// Runs one session.
pub struct Coordinator {
    session_id: Uuid,
    settings: EngineSettings,
    world: World,
    clock: Arc<dyn Clock>,
    scarcity: ScarcityManager,
    risk_reward: RiskRewardEngine,
    recovery: FailureRecoverySystem,
    version: i64,
    uncommitted_events: Vec<EngineEvent>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("session_id", &self.session_id)
            .field("turn", &self.world.state.turn)
            .field("version", &self.version)
            .field("uncommitted_events", &self.uncommitted_events.len())
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    /// A coordinator for `world` under `settings`.
    #[must_use]
    pub fn new(session_id: Uuid, settings: EngineSettings, world: World, clock: Arc<dyn Clock>) -> Self {
        let risk_reward = RiskRewardEngine::default().with_scaling(settings.rewards.clone());
        let recovery = FailureRecoverySystem {
            mechanics: settings.recovery.mechanics.clone(),
        };
        Self {
            session_id,
            settings,
            world,
            clock,
            scarcity: ScarcityManager::default(),
            risk_reward,
            recovery,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The committed world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Settings in force.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Events committed so far and already handed off.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Events produced since the last call, oldest first.
    #[allow(clippy::cast_possible_wrap)]
    pub fn take_uncommitted_events(&mut self) -> Vec<EngineEvent> {
        let events = std::mem::take(&mut self.uncommitted_events);
        self.version += events.len() as i64;
        events
    }

    /// Trade-offs the character can take right now.
    #[must_use]
    pub fn available_tradeoffs(&self) -> Vec<TradeoffMechanic> {
        self.risk_reward.get_available_tradeoffs(
            &self.world.state,
            &self.world.tradeoff_ledger,
            self.world.state.turn,
        )
    }

    /// Resilience over every recovery attempt so far.
    #[must_use]
    pub fn resilience(&self) -> ResilienceStats {
        calculate_player_resilience(&self.world.recovery_history)
    }

    /// Price of `resource_id` under the scarcity events in force.
    #[must_use]
    pub fn market_price(&self, base_price: u64, resource_id: &str) -> u64 {
        self.scarcity
            .market_price(base_price, resource_id, &self.world.scarcity_events)
    }

    /// Runs one turn: performance, scarcity, risk and reward, failure
    /// detection, consequences, faction ripples, quest checks, difficulty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownQuest` or `DomainError::Validation` if a
    /// reported quest outcome names a quest that is missing or not active.
    /// The world is left untouched.
    #[instrument(skip_all, fields(session_id = %self.session_id, correlation_id = %command.correlation_id))]
    #[allow(clippy::too_many_lines)]
    pub fn process_turn(
        &mut self,
        command: &ProcessTurn,
        rng: &mut dyn DeterministicRng,
    ) -> Result<TurnReport, DomainError> {
        let input = &command.input;
        let clock = Arc::clone(&self.clock);
        let mut world = self.world.clone();
        let mut events = Vec::new();
        let mut effects = Vec::new();
        let mut quest_failures = Vec::new();

        let mut context = input.context.clone();
        if context.combat_result.is_none() {
            context.combat_result = input.combat.map(|report| report.result);
        }

        let turns_passed = input.turns_passed.max(1);
        world.state.turn = world.state.turn.saturating_add(turns_passed);
        let turn = world.state.turn;
        if !context.location.is_empty() {
            world.state = world.state.with_location(&context.location);
        }

        // Performance
        let tracker = &self.settings.tracker;
        let mut metrics = observe_turn(&world.metrics);
        let combat = input.combat.or_else(|| {
            context.combat_result.map(|result| CombatReport {
                result,
                damage_taken: 0.0,
            })
        });
        if let Some(report) = &combat {
            metrics = record_combat_outcome(&metrics, report, tracker);
        }
        for action in &input.resource_actions {
            metrics = record_resource_action(&metrics, action, tracker);
        }
        for outcome in &input.quest_outcomes {
            metrics = record_quest_outcome(&metrics, outcome.success, tracker);
            let transition = QuestTransition {
                quest_id: outcome.quest_id.clone(),
            };
            if outcome.success {
                let quest = complete_quest(&outcome.quest_id, &world.state)?;
                world.state = world.state.with_quest(quest);
                events.push(EngineEventKind::QuestCompleted(transition));
            } else {
                let quest = world
                    .state
                    .quest(&outcome.quest_id)
                    .cloned()
                    .ok_or_else(|| DomainError::UnknownQuest(outcome.quest_id.clone()))?;
                if !quest.is_active() {
                    return Err(DomainError::Validation(format!(
                        "quest {} is not active",
                        quest.id
                    )));
                }
                let record = create_quest_failure_record(
                    &quest,
                    QuestFailureKind::ObjectiveFailed,
                    turn,
                    clock.as_ref(),
                );
                world.state = world.state.with_quest(fail_quest(&quest));
                events.push(EngineEventKind::QuestFailed(QuestFailed {
                    record: record.clone(),
                }));
                quest_failures.push(record);
            }
        }

        // Scarcity
        let level = if self.settings.scarcity.follow_difficulty {
            self.settings.scarcity.scarcity_level * world.difficulty.resource_scarcity
        } else {
            self.settings.scarcity.scarcity_level
        };
        let scarcity = self.scarcity.clone().with_scarcity_level(level);
        let tick = update_active_events(&world.scarcity_events, turns_passed);
        let triggered = scarcity.check_for_scarcity_events(&world.state, &tick.remaining, rng);
        world.scarcity_events = activate(&tick.remaining, &triggered);
        for event in &tick.expired {
            events.push(EngineEventKind::ScarcityEnded(ScarcityEnded {
                name: event.name.clone(),
            }));
        }
        for event in &triggered {
            effects.push(event.description.clone());
            events.push(EngineEventKind::ScarcityStarted(ScarcityStarted {
                name: event.name.clone(),
                resource_id: event.resource_id.clone(),
                duration: event.remaining_turns,
            }));
        }
        let resource_warnings = scarcity.get_resource_warnings(&world.state, &world.scarcity_events);

        // Risk and reward
        let risk = self
            .risk_reward
            .assess_action_risk(&input.action, &context, &world.state.character);
        let reward = match &input.reward {
            Some(base) => {
                let scaled = self.risk_reward.calculate_reward(
                    base,
                    risk.risk_level,
                    world.difficulty.combat_scaling,
                    input.time_bonus,
                    rng,
                );
                let (state, granted) =
                    grant_reward(&world.state, &scaled, input.reward_faction.as_deref(), turn);
                world.state = state;
                effects.extend(granted);
                events.push(EngineEventKind::RewardGranted(RewardGranted {
                    reward: scaled.clone(),
                }));
                Some(scaled)
            }
            None => None,
        };

        // Failure detection
        let failure =
            detect_failure(&input.action, &input.outcome, &context).map(|f| f.at_turn(turn));
        let recovery_options = match &failure {
            Some(failure) => {
                world.active_failure = Some(failure.clone());
                events.push(EngineEventKind::FailureDetected(FailureDetected {
                    failure: failure.clone(),
                }));
                self.recovery.generate_recovery_options(failure, &world.state)
            }
            None => Vec::new(),
        };

        // Consequences
        let mut faction_deltas: Vec<(Uuid, String, i32)> = Vec::new();
        let mut recorded = None;
        if let Some(choice_input) = &input.choice {
            let choice =
                record_player_choice(choice_input, &context, turn, &world.state, clock.as_ref());
            let choice_id = choice.id;
            events.push(EngineEventKind::ChoiceRecorded(ChoiceRecorded {
                choice_id,
                moral_tag: choice.moral_tag,
                difficulty: choice.difficulty,
            }));
            world.store_choice(choice);
            for consequence in &choice_input.consequences {
                if consequence.delay_turns > 0 {
                    let pending = PendingConsequence::schedule(choice_id, consequence.clone(), turn);
                    events.push(EngineEventKind::ConsequenceScheduled(ConsequenceScheduled {
                        choice_id,
                        consequence_id: consequence.id.clone(),
                        due_turn: pending.due_turn,
                    }));
                    world.pending_consequences.push(pending);
                } else if let Some(landed) = manifest_on(&mut world, choice_id, consequence, turn) {
                    faction_deltas.extend(landed.faction_deltas(choice_id));
                    effects.extend(landed.descriptions);
                    events.push(landed.event);
                }
            }
            recorded = Some(choice_id);
        }
        let (due, waiting) = split_due(&world.pending_consequences, turn);
        world.pending_consequences = waiting;
        for pending in due {
            let Some(landed) = manifest_on(&mut world, pending.choice_id, &pending.consequence, turn)
            else {
                warn!(choice_id = %pending.choice_id, consequence_id = %pending.consequence.id, "pending consequence has no recorded choice");
                continue;
            };
            faction_deltas.extend(landed.faction_deltas(pending.choice_id));
            effects.extend(landed.descriptions);
            events.push(landed.event);
        }
        if let Some(choice) = recorded.and_then(|id| world.choice(id)) {
            let profile = update_moral_profile(choice, &world.moral_profile, turn);
            if profile.alignment != world.moral_profile.alignment {
                events.push(EngineEventKind::AlignmentShifted(AlignmentShifted {
                    from: world.moral_profile.alignment,
                    to: profile.alignment,
                }));
            }
            world.moral_profile = profile;
        }

        // Faction ripples
        for (choice_id, faction_id, delta) in faction_deltas {
            let ripple = ripple_standing_change(&faction_id, delta, &world.factions);
            if ripple.is_empty() {
                continue;
            }
            let mut consequence = Consequence::new(format!("{faction_id}-ripple"), ripple);
            consequence.description = format!("Word of your dealings with {faction_id} spreads");
            consequence.category = ConsequenceCategory::Political;
            if let Some(landed) = manifest_on(&mut world, choice_id, &consequence, turn) {
                effects.extend(landed.descriptions);
                events.push(landed.event);
            }
        }
        let political_influence =
            calculate_political_influence(&world.factions, &world.state.factions);

        // Quests
        let active: Vec<Quest> = world.state.active_quests().cloned().collect();
        for quest in active {
            let Some(kind) = check_quest_failure_conditions(&quest, &world.state) else {
                continue;
            };
            let record = create_quest_failure_record(&quest, kind, turn, clock.as_ref());
            world.state = world.state.with_quest(fail_quest(&quest));
            metrics = record_quest_outcome(&metrics, false, tracker);
            events.push(EngineEventKind::QuestFailed(QuestFailed {
                record: record.clone(),
            }));
            quest_failures.push(record);
        }
        world.quest_failures.extend(quest_failures.iter().cloned());
        let available_branches: BTreeMap<String, Vec<String>> = world
            .state
            .active_quests()
            .map(|quest| {
                let ids: Vec<String> = get_available_quest_branches(quest, &world.state)
                    .iter()
                    .map(|b| b.id.clone())
                    .collect();
                (quest.id.clone(), ids)
            })
            .collect();

        // Difficulty
        world.metrics = metrics;
        world.difficulty = compute_difficulty(&self.settings.difficulty, &world.metrics);
        events.push(EngineEventKind::TurnProcessed(TurnProcessed {
            turn,
            overall_performance: world.metrics.overall,
            difficulty: world.difficulty,
        }));

        let report = TurnReport {
            session_id: self.session_id,
            turn,
            metrics: world.metrics.clone(),
            difficulty: world.difficulty,
            scarcity_events: world.scarcity_events.clone(),
            new_scarcity_events: triggered.iter().map(|e| e.name.clone()).collect(),
            expired_scarcity_events: tick.expired.iter().map(|e| e.name.clone()).collect(),
            resource_warnings,
            risk,
            reward,
            failure,
            recovery_options,
            choice: recorded.and_then(|id| world.choice(id).cloned()),
            effects,
            moral_profile: world.moral_profile.clone(),
            political_influence,
            quest_failures,
            available_branches,
        };

        self.world = world;
        for kind in events {
            self.emit(kind, turn, command.correlation_id);
        }
        info!(
            turn,
            overall = report.metrics.overall,
            risk = report.risk.risk_level,
            effects = report.effects.len(),
            "turn processed"
        );
        Ok(report)
    }

    /// Executes a trade-off.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTradeoff` or `DomainError::Validation`
    /// if the trade-off does not exist or cannot be afforded.
    #[instrument(skip_all, fields(session_id = %self.session_id, tradeoff_id = %command.tradeoff_id))]
    pub fn execute_tradeoff(
        &mut self,
        command: &ExecuteTradeoff,
        rng: &mut dyn DeterministicRng,
    ) -> Result<TradeoffOutcome, DomainError> {
        let outcome = self.risk_reward.execute_tradeoff(
            &command.tradeoff_id,
            &self.world.state,
            &self.world.tradeoff_ledger,
            self.world.state.turn,
            rng,
        )?;
        self.world.state = outcome.state.clone();
        self.world.tradeoff_ledger = outcome.ledger.clone();
        self.emit(
            EngineEventKind::TradeoffExecuted(TradeoffExecuted {
                tradeoff_id: outcome.tradeoff_id.clone(),
                benefit_granted: outcome.benefit_granted,
            }),
            self.world.state.turn,
            command.correlation_id,
        );
        Ok(outcome)
    }

    /// Attempts a remedy for the failure the player is still carrying.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if there is no outstanding failure
    /// or the remedy does not apply, and `DomainError::UnknownMechanic` if
    /// the remedy does not exist.
    #[instrument(skip_all, fields(session_id = %self.session_id, mechanic_id = %command.mechanic_id))]
    pub fn attempt_recovery(
        &mut self,
        command: &AttemptRecovery,
        rng: &mut dyn DeterministicRng,
    ) -> Result<RecoveryAttempt, DomainError> {
        let failure = self
            .world
            .active_failure
            .clone()
            .ok_or_else(|| DomainError::Validation("no failure to recover from".to_owned()))?;
        let turn = self.world.state.turn;
        let attempt = self.recovery.attempt_recovery(
            &command.mechanic_id,
            &failure,
            &self.world.state,
            turn,
            self.clock.as_ref(),
            rng,
        )?;
        self.world.state = attempt.state.clone();
        self.world.recovery_history.push(attempt.record.clone());
        if attempt.record.success {
            self.world.active_failure = None;
        }
        self.emit(
            EngineEventKind::RecoveryAttempted(RecoveryAttempted {
                record: attempt.record.clone(),
            }),
            turn,
            command.correlation_id,
        );
        Ok(attempt)
    }

    /// Commits a quest to a branch.
    ///
    /// # Errors
    ///
    /// Propagates `DomainError::UnknownQuest`, `DomainError::UnknownBranch`
    /// or `DomainError::Validation` from the quest state machine.
    #[instrument(skip_all, fields(session_id = %self.session_id, quest_id = %command.quest_id, branch_id = %command.branch_id))]
    pub fn select_quest_branch(&mut self, command: &SelectQuestBranch) -> Result<Quest, DomainError> {
        let quest = select_quest_branch(
            &command.quest_id,
            &command.branch_id,
            &self.world.state,
            self.clock.as_ref(),
        )?;
        let moral_tag = quest
            .choice_history
            .last()
            .map_or(MoralTag::Neutral, |c| c.moral_tag);
        self.world.state = self.world.state.clone().with_quest(quest.clone());
        self.emit(
            EngineEventKind::QuestBranchSelected(QuestBranchSelected {
                quest_id: command.quest_id.clone(),
                branch_id: command.branch_id.clone(),
                moral_tag,
            }),
            self.world.state.turn,
            command.correlation_id,
        );
        Ok(quest)
    }

    /// Starts a quest.
    ///
    /// # Errors
    ///
    /// Propagates quest state machine errors.
    pub fn start_quest(&mut self, command: &StartQuest) -> Result<Quest, DomainError> {
        let quest = start_quest(&command.quest_id, &self.world.state)?;
        Ok(self.commit_quest(quest, command.correlation_id, EngineEventKind::QuestStarted))
    }

    /// Completes a quest outside a turn.
    ///
    /// # Errors
    ///
    /// Propagates quest state machine errors.
    pub fn complete_quest(&mut self, command: &CompleteQuest) -> Result<Quest, DomainError> {
        let quest = complete_quest(&command.quest_id, &self.world.state)?;
        self.world.metrics = record_quest_outcome(&self.world.metrics, true, &self.settings.tracker);
        Ok(self.commit_quest(quest, command.correlation_id, EngineEventKind::QuestCompleted))
    }

    /// Puts a failed quest back in play.
    ///
    /// # Errors
    ///
    /// Propagates quest state machine errors.
    pub fn reactivate_quest(&mut self, command: &ReactivateQuest) -> Result<Quest, DomainError> {
        let quest = reactivate_quest(&command.quest_id, &self.world.state)?;
        Ok(self.commit_quest(quest, command.correlation_id, EngineEventKind::QuestReactivated))
    }

    /// Commits coin to a venture.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the principal cannot be paid.
    #[instrument(skip_all, fields(session_id = %self.session_id, principal = command.principal))]
    pub fn open_investment(&mut self, command: &OpenInvestment) -> Result<Investment, DomainError> {
        let turn = self.world.state.turn;
        let (state, investment) = self.risk_reward.open_investment(
            &command.name,
            command.principal,
            command.risk_level,
            &self.world.state,
            turn,
        )?;
        self.world.state = state;
        self.world.investments.push(investment.clone());
        self.emit(
            EngineEventKind::InvestmentOpened(InvestmentOpened {
                investment: investment.clone(),
            }),
            turn,
            command.correlation_id,
        );
        Ok(investment)
    }

    /// Cashes out an open investment.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no open investment has the
    /// identifier.
    #[instrument(skip_all, fields(session_id = %self.session_id, investment_id = %command.investment_id))]
    pub fn resolve_investment(
        &mut self,
        command: &ResolveInvestment,
        rng: &mut dyn DeterministicRng,
    ) -> Result<InvestmentReturn, DomainError> {
        let index = self
            .world
            .investments
            .iter()
            .position(|i| i.id == command.investment_id)
            .ok_or_else(|| {
                DomainError::Validation(format!("unknown investment {}", command.investment_id))
            })?;
        let turn = self.world.state.turn;
        let investment = self.world.investments.remove(index);
        let outcome = self
            .risk_reward
            .calculate_investment_return(&investment, turn, rng);
        self.world.state = settle_investment(&self.world.state, &outcome);
        self.emit(
            EngineEventKind::InvestmentResolved(InvestmentResolved {
                outcome: outcome.clone(),
            }),
            turn,
            command.correlation_id,
        );
        Ok(outcome)
    }

    /// Opens hostilities between two factions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownFaction` or `DomainError::Validation`
    /// from the faction graph.
    #[instrument(skip_all, fields(session_id = %self.session_id, faction_a = %command.faction_a, faction_b = %command.faction_b))]
    pub fn create_faction_conflict(
        &mut self,
        command: &CreateFactionConflict,
    ) -> Result<FactionConflict, DomainError> {
        let turn = self.world.state.turn;
        let (factions, conflict) = create_faction_conflict(
            &command.faction_a,
            &command.faction_b,
            &command.description,
            command.consequences.clone(),
            turn,
            &self.world.factions,
        )?;
        self.world.factions = factions;
        self.world.conflicts.push(conflict.clone());
        self.emit(
            EngineEventKind::FactionConflictStarted(FactionConflictStarted {
                conflict_id: conflict.id,
                faction_a: conflict.faction_a.clone(),
                faction_b: conflict.faction_b.clone(),
            }),
            turn,
            command.correlation_id,
        );
        Ok(conflict)
    }

    /// Settles a faction conflict.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the conflict is unknown or
    /// already settled.
    #[instrument(skip_all, fields(session_id = %self.session_id, conflict_id = %command.conflict_id))]
    pub fn resolve_faction_conflict(
        &mut self,
        command: &ResolveFactionConflict,
    ) -> Result<FactionConflict, DomainError> {
        let conflict = self
            .world
            .conflict(command.conflict_id)
            .cloned()
            .ok_or_else(|| DomainError::Validation(format!("unknown conflict {}", command.conflict_id)))?;
        let turn = self.world.state.turn;
        let (factions, settled) = resolve_faction_conflict(
            &conflict,
            command.resolution.clone(),
            turn,
            &self.world.factions,
        )?;
        self.world.factions = factions;
        if let Some(slot) = self.world.conflicts.iter_mut().find(|c| c.id == settled.id) {
            *slot = settled.clone();
        }
        self.emit(
            EngineEventKind::FactionConflictResolved(FactionConflictResolved {
                conflict_id: settled.id,
            }),
            turn,
            command.correlation_id,
        );
        Ok(settled)
    }

    /// Undoes a manifested consequence.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the choice or consequence is
    /// unknown, irreversible or already reverted.
    #[instrument(skip_all, fields(session_id = %self.session_id, choice_id = %command.choice_id, consequence_id = %command.consequence_id))]
    pub fn revert_consequence(
        &mut self,
        command: &RevertConsequence,
    ) -> Result<ManifestOutcome, DomainError> {
        let choice = self
            .world
            .choice(command.choice_id)
            .cloned()
            .ok_or_else(|| DomainError::Validation(format!("unknown choice {}", command.choice_id)))?;
        let turn = self.world.state.turn;
        let outcome = revert_consequence(&choice, &command.consequence_id, turn, &self.world.state)?;
        self.world.state = outcome.state.clone();
        self.world.store_choice(outcome.choice.clone());
        self.emit(
            EngineEventKind::ConsequenceReverted(ConsequenceReverted {
                choice_id: command.choice_id,
                consequence_id: command.consequence_id.clone(),
            }),
            turn,
            command.correlation_id,
        );
        Ok(outcome)
    }

    fn commit_quest(
        &mut self,
        quest: Quest,
        correlation_id: Uuid,
        kind: fn(QuestTransition) -> EngineEventKind,
    ) -> Quest {
        self.world.state = self.world.state.clone().with_quest(quest.clone());
        self.emit(
            kind(QuestTransition {
                quest_id: quest.id.clone(),
            }),
            self.world.state.turn,
            correlation_id,
        );
        quest
    }

    #[allow(clippy::cast_possible_wrap)]
    fn emit(&mut self, kind: EngineEventKind, turn: TurnNumber, correlation_id: Uuid) {
        let event = EngineEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                session_id: self.session_id,
                sequence_number: self.version + self.uncommitted_events.len() as i64 + 1,
                turn,
                correlation_id,
                occurred_at: self.clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}

struct Landed {
    effects: Vec<ConsequenceEffect>,
    descriptions: Vec<String>,
    event: EngineEventKind,
}

impl Landed {
    fn faction_deltas(&self, choice_id: Uuid) -> impl Iterator<Item = (Uuid, String, i32)> + '_ {
        self.effects.iter().filter_map(move |effect| match effect {
            ConsequenceEffect::FactionDelta { faction_id, delta } if *delta != 0 => {
                Some((choice_id, faction_id.clone(), *delta))
            }
            _ => None,
        })
    }
}

/// Manifests `consequence` against the recorded choice and writes the result
/// back into the world. `None` when the choice is not on record.
fn manifest_on(
    world: &mut World,
    choice_id: Uuid,
    consequence: &Consequence,
    turn: TurnNumber,
) -> Option<Landed> {
    let choice = world.choice(choice_id)?;
    let outcome = manifest_consequence(consequence, choice, turn, &world.state);
    let effects = outcome
        .choice
        .consequences
        .last()
        .map(|t| t.applied_effects.clone())
        .unwrap_or_default();
    world.state = outcome.state;
    world.store_choice(outcome.choice);
    let event = EngineEventKind::ConsequenceManifested(ConsequenceManifested {
        choice_id,
        consequence_id: consequence.id.clone(),
        effects: effects.clone(),
    });
    Some(Landed {
        effects,
        descriptions: outcome.descriptions,
        event,
    })
}

fn grant_reward(
    state: &StoryState,
    reward: &ScaledReward,
    faction_id: Option<&str>,
    turn: TurnNumber,
) -> (StoryState, Vec<String>) {
    let mut next = state.clone();
    let mut granted = Vec::new();
    next.character.experience = next.character.experience.saturating_add(reward.experience);
    next.character.currency = next.character.currency.saturating_add(reward.currency);
    if reward.experience > 0 || reward.currency > 0 {
        granted.push(format!(
            "Gained {} experience and {} coin",
            reward.experience, reward.currency
        ));
    }
    if let Some(faction_id) = faction_id.filter(|_| reward.reputation != 0) {
        let standing = next
            .standing(faction_id)
            .with_delta(reward.reputation, "reward", turn);
        granted.push(format!("Reputation with {faction_id} now {}", standing.reputation));
        next = next.with_standing(standing);
    }
    if let Some(item) = &reward.bonus_item {
        next = next.with_item_added(item, item, 1);
        granted.push(format!("Found {item}"));
    }
    (next, granted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_consequence::domain::choice::ChoiceInput;
    use wayfarer_consequence::domain::faction::{ConflictResolution, Faction, FactionRelationship};
    use wayfarer_core::event::DomainEvent;
    use wayfarer_core::rng::SeededRng;
    use wayfarer_economy::domain::reward::BaseReward;
    use wayfarer_recovery::domain::failure::FailureCategory;
    use wayfarer_test_support::{MockRng, fixed_clock};
    use wayfarer_world_state::domain::context::{ActionContext, CombatResult};
    use wayfarer_world_state::domain::inventory::InventoryItem;
    use wayfarer_world_state::domain::npc::TrackedNpc;
    use wayfarer_world_state::domain::quest::{QuestFailureCondition, QuestStatus};
    use wayfarer_world_state::domain::standing::{FactionStanding, StandingLabel};

    use crate::domain::report::{QuestOutcome, TurnInput};

    fn world() -> World {
        let mut quest = Quest::new("escort", "Escort the Envoy");
        quest.status = QuestStatus::Active;
        quest.started_turn = Some(0);
        quest.failure_conditions = vec![QuestFailureCondition::ItemLost {
            item_id: "seal".to_owned(),
        }];
        let mut state = StoryState {
            location: "Harrow Gate".to_owned(),
            inventory: vec![
                InventoryItem::new("bread", "Bread", 6),
                InventoryItem::new("torch", "Torch", 4),
                InventoryItem::new("seal", "Envoy's Seal", 1),
            ],
            ..StoryState::default()
        }
        .with_quest(quest)
        .with_standing(FactionStanding::at("iron_court", 10));
        state.npcs.push(TrackedNpc::stranger("envoy"));
        state.character.currency = 100;
        World::new(state).with_factions(vec![
            Faction::new("iron_court", "The Iron Court", 60.0),
            Faction::new("ash_guild", "The Ash Guild", 40.0),
        ])
    }

    fn coordinator() -> Coordinator {
        Coordinator::new(
            Uuid::new_v4(),
            EngineSettings::default(),
            world(),
            Arc::new(fixed_clock()),
        )
    }

    fn turn(input: TurnInput) -> ProcessTurn {
        ProcessTurn::new(input)
    }

    #[test]
    fn test_quiet_turn_advances_turn_and_emits_turn_processed() {
        // Arrange
        let mut coordinator = coordinator();
        let mut rng = SeededRng::from_seed(7);

        // Act
        let report = coordinator
            .process_turn(&turn(TurnInput::default()), &mut rng)
            .unwrap();

        // Assert
        assert_eq!(report.turn, 1);
        assert_eq!(coordinator.world().state.turn, 1);
        assert!(report.failure.is_none());
        assert!(report.choice.is_none());
        let events = coordinator.take_uncommitted_events();
        let last = events.last().unwrap();
        assert_eq!(last.event_type(), "engine.turn_processed");
        assert_eq!(last.metadata().sequence_number, events.len() as i64);
        assert_eq!(coordinator.version(), events.len() as i64);
    }

    #[test]
    fn test_turns_passed_advances_several_turns() {
        let mut coordinator = coordinator();
        let input = TurnInput {
            turns_passed: 3,
            ..TurnInput::default()
        };

        let report = coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(1))
            .unwrap();

        assert_eq!(report.turn, 3);
    }

    #[test]
    fn test_location_in_context_moves_the_party() {
        let mut coordinator = coordinator();
        let input = TurnInput {
            context: ActionContext::at("Saltmarsh"),
            ..TurnInput::default()
        };

        coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(1))
            .unwrap();

        assert_eq!(coordinator.world().state.location, "Saltmarsh");
        assert!(coordinator.world().state.has_visited("Saltmarsh"));
    }

    #[test]
    fn test_combat_defeat_is_tracked_and_flagged_for_recovery() {
        // Arrange
        let mut coordinator = coordinator();
        let input = TurnInput {
            action: "charge the bandits".to_owned(),
            outcome: "beaten back".to_owned(),
            context: ActionContext {
                combat_result: Some(CombatResult::Defeat),
                enemy_count: 4,
                ..ActionContext::default()
            },
            ..TurnInput::default()
        };

        // Act
        let report = coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(3))
            .unwrap();

        // Assert
        assert_eq!(report.metrics.defeats, 1);
        let failure = report.failure.unwrap();
        assert_eq!(failure.category, FailureCategory::CombatDefeat);
        assert_eq!(coordinator.world().active_failure, Some(failure));
        assert!(
            coordinator
                .take_uncommitted_events()
                .iter()
                .any(|e| e.event_type() == "recovery.failure_detected")
        );
    }

    #[test]
    fn test_reward_is_scaled_and_credited() {
        let mut coordinator = coordinator();
        let input = TurnInput {
            action: "fight the wolf".to_owned(),
            reward: Some(BaseReward {
                experience: 100,
                currency: 50,
                reputation: 10,
            }),
            reward_faction: Some("iron_court".to_owned()),
            ..TurnInput::default()
        };

        let report = coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(11))
            .unwrap();

        let reward = report.reward.unwrap();
        assert!(reward.experience >= 100);
        let state = &coordinator.world().state;
        assert_eq!(state.character.experience, reward.experience);
        assert_eq!(state.character.currency, 100 + reward.currency);
        assert_eq!(state.standing("iron_court").reputation, 10 + reward.reputation);
    }

    #[test]
    fn test_choice_manifests_immediate_and_schedules_delayed_consequences() {
        // Arrange
        let mut coordinator = coordinator();
        let mut delayed = Consequence::new(
            "guild-retaliates",
            vec![ConsequenceEffect::FactionDelta {
                faction_id: "ash_guild".to_owned(),
                delta: -10,
            }],
        );
        delayed.delay_turns = 2;
        let input = TurnInput {
            choice: Some(ChoiceInput {
                text: "help the envoy escape".to_owned(),
                moral_tag: Some(MoralTag::Good),
                consequences: vec![
                    Consequence::new(
                        "envoy-grateful",
                        vec![ConsequenceEffect::RelationshipDelta {
                            npc_id: "envoy".to_owned(),
                            delta: 25,
                        }],
                    ),
                    delayed,
                ],
                ..ChoiceInput::default()
            }),
            ..TurnInput::default()
        };
        let mut rng = SeededRng::from_seed(5);

        // Act
        let report = coordinator.process_turn(&turn(input), &mut rng).unwrap();

        // Assert
        let choice = report.choice.unwrap();
        assert_eq!(choice.consequences.len(), 1);
        assert_eq!(coordinator.world().state.npc_or_stranger("envoy").relationship, 25);
        assert_eq!(coordinator.world().pending_consequences.len(), 1);
        assert_eq!(coordinator.world().pending_consequences[0].due_turn, 3);

        coordinator.process_turn(&turn(TurnInput::default()), &mut rng).unwrap();
        assert_eq!(coordinator.world().state.standing("ash_guild").reputation, 0);

        let report = coordinator.process_turn(&turn(TurnInput::default()), &mut rng).unwrap();
        assert!(coordinator.world().pending_consequences.is_empty());
        assert_eq!(coordinator.world().state.standing("ash_guild").reputation, -10);
        assert_eq!(coordinator.world().choice(choice.id).unwrap().consequences.len(), 2);
        assert!(!report.effects.is_empty());
    }

    #[test]
    fn test_faction_delta_ripples_to_allies() {
        // Arrange
        let mut factions = world().factions;
        factions[0].relationships.push(FactionRelationship {
            score: 60,
            ..FactionRelationship::neutral("ash_guild")
        });
        let world = world().with_factions(factions);
        let mut coordinator = Coordinator::new(
            Uuid::new_v4(),
            EngineSettings::default(),
            world,
            Arc::new(fixed_clock()),
        );
        let input = TurnInput {
            choice: Some(ChoiceInput {
                text: "swear fealty".to_owned(),
                consequences: vec![Consequence::new(
                    "oath",
                    vec![ConsequenceEffect::FactionDelta {
                        faction_id: "iron_court".to_owned(),
                        delta: 20,
                    }],
                )],
                ..ChoiceInput::default()
            }),
            ..TurnInput::default()
        };

        // Act
        let report = coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(9))
            .unwrap();

        // Assert
        let state = &coordinator.world().state;
        assert_eq!(state.standing("iron_court").reputation, 30);
        assert_eq!(state.standing("ash_guild").reputation, 10);
        let choice = report.choice.unwrap();
        assert!(choice.tracking("iron_court-ripple").is_some());
    }

    #[test]
    fn test_extreme_faction_delta_clamps_and_turns_hostile() {
        let mut coordinator = coordinator();
        let state = coordinator.world.state.clone();
        coordinator.world.state = state.with_standing(FactionStanding::at("iron_court", 80));
        let input = TurnInput {
            choice: Some(ChoiceInput {
                text: "burn the court's charter".to_owned(),
                consequences: vec![Consequence::new(
                    "charter",
                    vec![ConsequenceEffect::FactionDelta {
                        faction_id: "iron_court".to_owned(),
                        delta: -200,
                    }],
                )],
                ..ChoiceInput::default()
            }),
            ..TurnInput::default()
        };

        coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(2))
            .unwrap();

        let standing = coordinator.world().state.standing("iron_court");
        assert_eq!(standing.reputation, -100);
        assert_eq!(standing.label, StandingLabel::Hostile);
        assert_eq!(standing.history.len(), 1);
    }

    #[test]
    fn test_losing_the_seal_fails_the_escort_quest() {
        // Arrange
        let mut coordinator = coordinator();
        let input = TurnInput {
            choice: Some(ChoiceInput {
                text: "trade the seal for passage".to_owned(),
                consequences: vec![Consequence::new(
                    "seal-traded",
                    vec![ConsequenceEffect::ItemLost {
                        item_id: "seal".to_owned(),
                        quantity: 1,
                    }],
                )],
                ..ChoiceInput::default()
            }),
            ..TurnInput::default()
        };

        // Act
        let report = coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(4))
            .unwrap();

        // Assert
        assert_eq!(report.quest_failures.len(), 1);
        assert_eq!(report.quest_failures[0].quest_id, "escort");
        assert_eq!(
            coordinator.world().state.quest("escort").unwrap().status,
            QuestStatus::Failed
        );
        assert_eq!(report.metrics.quests_failed, 1);
        assert!(!report.available_branches.contains_key("escort"));
    }

    #[test]
    fn test_unknown_quest_outcome_rejects_the_whole_turn() {
        // Arrange
        let mut coordinator = coordinator();
        let before = coordinator.world().clone();
        let input = TurnInput {
            quest_outcomes: vec![QuestOutcome {
                quest_id: "nowhere".to_owned(),
                success: true,
            }],
            ..TurnInput::default()
        };

        // Act
        let result = coordinator.process_turn(&turn(input), &mut SeededRng::from_seed(1));

        // Assert
        assert_eq!(result, Err(DomainError::UnknownQuest("nowhere".to_owned())));
        assert_eq!(coordinator.world(), &before);
        assert!(coordinator.take_uncommitted_events().is_empty());
    }

    #[test]
    fn test_reported_quest_failure_records_objective_failed() {
        let mut coordinator = coordinator();
        let input = TurnInput {
            quest_outcomes: vec![QuestOutcome {
                quest_id: "escort".to_owned(),
                success: false,
            }],
            ..TurnInput::default()
        };

        let report = coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(1))
            .unwrap();

        assert_eq!(report.quest_failures.len(), 1);
        assert_eq!(report.quest_failures[0].kind, QuestFailureKind::ObjectiveFailed);
        assert_eq!(coordinator.world().quest_failures.len(), 1);
    }

    #[test]
    fn test_attempt_recovery_without_failure_is_rejected() {
        let mut coordinator = coordinator();

        let result = coordinator.attempt_recovery(
            &AttemptRecovery {
                correlation_id: Uuid::new_v4(),
                mechanic_id: "second_wind".to_owned(),
            },
            &mut MockRng,
        );

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_successful_recovery_clears_the_outstanding_failure() {
        // Arrange
        let mut coordinator = coordinator();
        let input = TurnInput {
            context: ActionContext {
                combat_result: Some(CombatResult::Defeat),
                ..ActionContext::default()
            },
            ..TurnInput::default()
        };
        let report = coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(3))
            .unwrap();
        let mechanic_id = report.recovery_options[0].id.clone();

        // Act
        let attempt = coordinator
            .attempt_recovery(
                &AttemptRecovery {
                    correlation_id: Uuid::new_v4(),
                    mechanic_id,
                },
                &mut MockRng,
            )
            .unwrap();

        // Assert
        assert!(attempt.record.success);
        assert!(coordinator.world().active_failure.is_none());
        assert_eq!(coordinator.world().recovery_history.len(), 1);
        assert_eq!(coordinator.resilience().attempts, 1);
    }

    #[test]
    fn test_recovery_rejected_after_its_window_closes() {
        // Arrange
        let mut coordinator = coordinator();
        let defeat = TurnInput {
            context: ActionContext {
                combat_result: Some(CombatResult::Defeat),
                ..ActionContext::default()
            },
            ..TurnInput::default()
        };
        let report = coordinator
            .process_turn(&turn(defeat), &mut SeededRng::from_seed(3))
            .unwrap();
        assert_eq!(report.failure.as_ref().map(|f| f.turn), Some(1));
        for _ in 0..20 {
            coordinator
                .process_turn(&turn(TurnInput::default()), &mut SeededRng::from_seed(3))
                .unwrap();
        }

        // Act
        let result = coordinator.attempt_recovery(
            &AttemptRecovery {
                correlation_id: Uuid::new_v4(),
                mechanic_id: "second_wind".to_owned(),
            },
            &mut MockRng,
        );

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(coordinator.world().active_failure.is_some());
        assert!(coordinator.world().recovery_history.is_empty());
    }

    #[test]
    fn test_investment_round_trip_through_commands() {
        let mut coordinator = coordinator();
        let investment = coordinator
            .open_investment(&OpenInvestment {
                correlation_id: Uuid::new_v4(),
                name: "caravan".to_owned(),
                principal: 40,
                risk_level: 0.0,
            })
            .unwrap();
        assert_eq!(coordinator.world().state.character.currency, 60);

        let outcome = coordinator
            .resolve_investment(
                &ResolveInvestment {
                    correlation_id: Uuid::new_v4(),
                    investment_id: investment.id,
                },
                &mut MockRng,
            )
            .unwrap();

        assert!(outcome.success);
        assert_eq!(coordinator.world().state.character.currency, 60 + outcome.payout);
        assert!(coordinator.world().investments.is_empty());
        let repeat = coordinator.resolve_investment(
            &ResolveInvestment {
                correlation_id: Uuid::new_v4(),
                investment_id: investment.id,
            },
            &mut MockRng,
        );
        assert!(matches!(repeat, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_faction_conflict_lifecycle_emits_events() {
        let mut coordinator = coordinator();
        let conflict = coordinator
            .create_faction_conflict(&CreateFactionConflict {
                correlation_id: Uuid::new_v4(),
                faction_a: "iron_court".to_owned(),
                faction_b: "ash_guild".to_owned(),
                description: "border tolls".to_owned(),
                consequences: Vec::new(),
            })
            .unwrap();

        let settled = coordinator
            .resolve_faction_conflict(&ResolveFactionConflict {
                correlation_id: Uuid::new_v4(),
                conflict_id: conflict.id,
                resolution: ConflictResolution {
                    description: "tolls halved".to_owned(),
                    consequences: Vec::new(),
                },
            })
            .unwrap();

        assert!(settled.is_resolved());
        assert!(coordinator.world().conflict(conflict.id).unwrap().is_resolved());
        let types: Vec<&str> = coordinator
            .take_uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect();
        assert_eq!(
            types,
            vec![
                "consequence.faction_conflict_started",
                "consequence.faction_conflict_resolved"
            ]
        );
    }

    #[test]
    fn test_revert_restores_relationship() {
        let mut coordinator = coordinator();
        let input = TurnInput {
            choice: Some(ChoiceInput {
                text: "insult the envoy".to_owned(),
                consequences: vec![Consequence::new(
                    "insult",
                    vec![ConsequenceEffect::RelationshipDelta {
                        npc_id: "envoy".to_owned(),
                        delta: -30,
                    }],
                )],
                ..ChoiceInput::default()
            }),
            ..TurnInput::default()
        };
        let report = coordinator
            .process_turn(&turn(input), &mut SeededRng::from_seed(6))
            .unwrap();
        let choice_id = report.choice.unwrap().id;

        coordinator
            .revert_consequence(&RevertConsequence {
                correlation_id: Uuid::new_v4(),
                choice_id,
                consequence_id: "insult".to_owned(),
            })
            .unwrap();

        assert_eq!(coordinator.world().state.npc_or_stranger("envoy").relationship, 0);
        assert!(coordinator.world().choice(choice_id).unwrap().consequences[0].reverted);
    }

    #[test]
    fn test_quest_commands_walk_the_lifecycle() {
        let mut coordinator = coordinator();
        let state = coordinator.world.state.clone();
        coordinator.world.state = state.with_quest(Quest::new("ferry", "The Ferryman's Debt"));

        coordinator
            .start_quest(&StartQuest {
                correlation_id: Uuid::new_v4(),
                quest_id: "ferry".to_owned(),
            })
            .unwrap();
        coordinator
            .complete_quest(&CompleteQuest {
                correlation_id: Uuid::new_v4(),
                quest_id: "ferry".to_owned(),
            })
            .unwrap();
        let reactivate = coordinator.reactivate_quest(&ReactivateQuest {
            correlation_id: Uuid::new_v4(),
            quest_id: "ferry".to_owned(),
        });

        assert_eq!(
            coordinator.world().state.quest("ferry").unwrap().status,
            QuestStatus::Completed
        );
        assert!(matches!(reactivate, Err(DomainError::Validation(_))));
        assert_eq!(coordinator.world().metrics.quests_completed, 1);
    }

    #[test]
    fn test_unknown_tradeoff_propagates() {
        let mut coordinator = coordinator();

        let result = coordinator.execute_tradeoff(
            &ExecuteTradeoff {
                correlation_id: Uuid::new_v4(),
                tradeoff_id: "sell_soul".to_owned(),
            },
            &mut MockRng,
        );

        assert_eq!(result, Err(DomainError::UnknownTradeoff("sell_soul".to_owned())));
    }
}
