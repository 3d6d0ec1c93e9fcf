//! CLI error types.

use thiserror::Error;
use wayfarer_core::error::DomainError;

/// Startup and runtime errors for the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The engine rejected a turn or the settings.
    #[error("engine error: {0}")]
    Domain(#[from] DomainError),

    /// A file could not be read or output could not be written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A scenario file is not valid YAML for a scenario.
    #[error("scenario error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A report could not be encoded.
    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
