//! Domain event abstractions.
//!
//! Every state change the engine commits during a turn is described by an
//! event. Events are buffered and handed to the persistence collaborator;
//! the engine never reads them back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::TurnNumber;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for deserialization routing.
    pub event_type: String,
    /// Game session this event belongs to.
    pub session_id: Uuid,
    /// Monotonically increasing position within the session stream.
    pub sequence_number: i64,
    /// Turn during which the event was produced.
    pub turn: TurnNumber,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for serialization routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}
