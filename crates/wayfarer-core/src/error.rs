//! Domain error types.
//!
//! Only unresolvable references and rejected commands are errors. Scores
//! that drift outside their bounds are clamped where they are computed and
//! never surface here.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A recovery mechanic identifier did not resolve against the catalogue.
    #[error("unknown recovery mechanic: {0}")]
    UnknownMechanic(String),

    /// A trade-off identifier did not resolve against the catalogue.
    #[error("unknown trade-off: {0}")]
    UnknownTradeoff(String),

    /// A quest identifier did not resolve against the story state.
    #[error("unknown quest: {0}")]
    UnknownQuest(String),

    /// A branch identifier did not resolve against its quest.
    #[error("unknown branch {branch_id} on quest {quest_id}")]
    UnknownBranch {
        /// The quest that was searched.
        quest_id: String,
        /// The branch that was requested.
        branch_id: String,
    },

    /// A faction identifier did not resolve against the faction graph.
    #[error("unknown faction: {0}")]
    UnknownFaction(String),

    /// A command was rejected by domain rules (unaffordable, on cooldown,
    /// wrong lifecycle state, irreversible effect).
    #[error("validation error: {0}")]
    Validation(String),

    /// Engine settings could not be read or parsed.
    #[error("configuration error: {0}")]
    Configuration(String),
}
