//! Outbound simulation events.
//!
//! The [`FlowerpotService`](super::service::FlowerpotService) emits these
//! through the [`EventSink`](super::ports::EventSink) port whenever
//! renderable state changes.

use serde::Serialize;

use crate::broker::{BrokerMessage, BrokerStats};
use crate::config::Mode;
use crate::control::ActuatorStatus;
use crate::events::EventLogEntry;
use crate::sensors::SensorReading;

use super::choreography::ChoreographyId;

/// Structured events emitted by the simulation core.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// The input surface produced a new reading.
    SensorsChanged(SensorReading),

    /// A log entry was appended.
    LogAppended(EventLogEntry),

    /// The broker recorded a publish or deliver hop.
    MessageRouted(BrokerMessage),

    /// At least one actuator flipped.
    StatusChanged {
        from: ActuatorStatus,
        to: ActuatorStatus,
    },

    /// A broker round trip was scheduled for a new reading.
    ChoreographyStarted { id: ChoreographyId },

    /// Pending steps of a round trip were dropped in favour of a newer one.
    ChoreographyCancelled { id: ChoreographyId },

    /// A round trip ran to its end; `applied` actuators flipped.
    ChoreographyCompleted { id: ChoreographyId, applied: usize },

    /// Orchestration mode switched.
    ModeChanged { mode: Mode },
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub mode: Mode,
    pub reading: SensorReading,
    pub status: ActuatorStatus,
    /// Newest first.
    pub log: Vec<EventLogEntry>,
    /// Newest first.
    pub messages: Vec<BrokerMessage>,
    pub broker_stats: BrokerStats,
    /// A broker round trip still has pending steps.
    pub in_flight: bool,
    pub cancelled_choreographies: u64,
}
