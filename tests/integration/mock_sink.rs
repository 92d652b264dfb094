//! Recording event sink for integration tests.
//!
//! Keeps every emitted event so tests can assert on the full history
//! without a renderer.

use flowerpot::app::events::SimEvent;
use flowerpot::app::ports::EventSink;
use flowerpot::app::service::FlowerpotService;
use flowerpot::config::{Mode, SimConfig};
use flowerpot::control::ActuatorStatus;
use flowerpot::events::EventLogEntry;
use flowerpot::time::Millis;

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<SimEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_entries(&self) -> Vec<&EventLogEntry> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::LogAppended(entry) => Some(entry),
                _ => None,
            })
            .collect()
    }

    pub fn status_changes(&self) -> Vec<ActuatorStatus> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SimEvent::StatusChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::ChoreographyCancelled { .. }))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &SimEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixtures ──────────────────────────────────────────────────

#[allow(dead_code)]
pub fn make_service(mode: Mode) -> (FlowerpotService, RecordingSink) {
    let config = SimConfig {
        mode,
        ..SimConfig::default()
    };
    let service = FlowerpotService::new(config, Millis::ZERO).expect("default config is valid");
    (service, RecordingSink::new())
}
