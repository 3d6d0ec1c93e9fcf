//! Wayfarer scenario runner entry point.

use std::io::Write;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wayfarer_cli::error::CliError;
use wayfarer_cli::runner::{run, write_report};
use wayfarer_cli::scenario::Scenario;
use wayfarer_core::rng::SeededRng;
use wayfarer_core::time::{Clock, SystemClock};
use wayfarer_engine::config::EngineSettings;

fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout carries only reports.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Wayfarer scenario runner");

    // Read configuration from environment.
    let settings = match std::env::var("WAYFARER_SETTINGS") {
        Ok(path) => EngineSettings::load(path)?,
        Err(_) => EngineSettings::default(),
    };
    let scenario_path = std::env::var("WAYFARER_SCENARIO")
        .map_err(|_| CliError::Config("WAYFARER_SCENARIO must be set".to_owned()))?;
    let mut rng = match std::env::var("WAYFARER_SEED") {
        Ok(seed) => SeededRng::from_seed(
            seed.parse()
                .map_err(|e| CliError::Config(format!("WAYFARER_SEED must be a valid u64: {e}")))?,
        ),
        Err(_) => SeededRng::from_entropy(),
    };

    let scenario = Scenario::load(&scenario_path)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let coordinator = run(settings, scenario, clock, &mut rng, |report| {
        write_report(&mut out, report)
    })?;
    out.flush()?;

    tracing::info!(
        session_id = %coordinator.session_id(),
        turn = coordinator.world().state.turn,
        "Scenario finished"
    );
    Ok(())
}
