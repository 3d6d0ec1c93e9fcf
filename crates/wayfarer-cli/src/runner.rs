//! Plays a scenario through one coordinator.

use std::io::Write;
use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;
use wayfarer_core::rng::DeterministicRng;
use wayfarer_core::time::Clock;
use wayfarer_engine::application::coordinator::Coordinator;
use wayfarer_engine::config::EngineSettings;
use wayfarer_engine::domain::commands::ProcessTurn;
use wayfarer_engine::domain::report::TurnReport;

use crate::error::CliError;
use crate::scenario::Scenario;

/// Runs every turn in order, handing each report to `sink` as it lands.
///
/// # Errors
///
/// Stops at the first turn the engine rejects, or the first error from
/// `sink`.
#[instrument(skip_all, fields(turns = scenario.turns.len()))]
pub fn run<F>(
    settings: EngineSettings,
    scenario: Scenario,
    clock: Arc<dyn Clock>,
    rng: &mut dyn DeterministicRng,
    mut sink: F,
) -> Result<Coordinator, CliError>
where
    F: FnMut(&TurnReport) -> Result<(), CliError>,
{
    let session_id = scenario.session_id.unwrap_or_else(Uuid::new_v4);
    let (world, turns) = scenario.into_world()?;
    let mut coordinator = Coordinator::new(session_id, settings, world, clock);
    for input in turns {
        let report = coordinator.process_turn(&ProcessTurn::new(input), rng)?;
        let events = coordinator.take_uncommitted_events();
        info!(%session_id, turn = report.turn, events = events.len(), "turn committed");
        sink(&report)?;
    }
    Ok(coordinator)
}

/// Writes a report as one JSON line.
///
/// # Errors
///
/// Returns `CliError::Json` or `CliError::Io` if encoding or writing fails.
pub fn write_report(out: &mut impl Write, report: &TurnReport) -> Result<(), CliError> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_core::error::DomainError;
    use wayfarer_engine::domain::report::{QuestOutcome, TurnInput};
    use wayfarer_test_support::{MockRng, fixed_clock};

    fn scenario(turns: Vec<TurnInput>) -> Scenario {
        Scenario {
            turns,
            ..Scenario::default()
        }
    }

    #[test]
    fn test_run_reports_every_turn_as_json_lines() {
        // Arrange
        let turns = vec![TurnInput::default(), TurnInput::default(), TurnInput::default()];
        let mut out = Vec::new();

        // Act
        let coordinator = run(
            EngineSettings::default(),
            scenario(turns),
            Arc::new(fixed_clock()),
            &mut MockRng,
            |report| write_report(&mut out, report),
        )
        .unwrap();

        // Assert
        assert_eq!(coordinator.world().state.turn, 3);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let last: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last["turn"], 3);
    }

    #[test]
    fn test_run_stops_at_rejected_turn() {
        let turns = vec![
            TurnInput::default(),
            TurnInput {
                quest_outcomes: vec![QuestOutcome {
                    quest_id: "lost".to_owned(),
                    success: true,
                }],
                ..TurnInput::default()
            },
            TurnInput::default(),
        ];
        let mut seen = 0;

        let result = run(
            EngineSettings::default(),
            scenario(turns),
            Arc::new(fixed_clock()),
            &mut MockRng,
            |_| {
                seen += 1;
                Ok(())
            },
        );

        assert!(matches!(
            result,
            Err(CliError::Domain(DomainError::UnknownQuest(_)))
        ));
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_scenario_session_id_is_kept() {
        let session_id = Uuid::new_v4();
        let scenario = Scenario {
            session_id: Some(session_id),
            ..scenario(vec![TurnInput::default()])
        };

        let coordinator = run(
            EngineSettings::default(),
            scenario,
            Arc::new(fixed_clock()),
            &mut MockRng,
            |_| Ok(()),
        )
        .unwrap();

        assert_eq!(coordinator.session_id(), session_id);
    }
}
