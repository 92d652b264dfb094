//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured simulation events to the
//! `log` facade (stderr via `env_logger` in the demo binary).  A graphical
//! front end would implement the same trait and re-render instead.

use log::{debug, info};

use crate::app::events::SimEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`SimEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SimEvent) {
        match event {
            SimEvent::SensorsChanged(r) => {
                info!(
                    "SENSE | T={:.0}\u{00b0}C | H={:.0}% | L={:.0}lux",
                    r.temperature, r.humidity, r.light
                );
            }
            SimEvent::LogAppended(entry) => {
                info!("LOG   | {entry}");
            }
            SimEvent::MessageRouted(msg) => {
                debug!("MQTT  | #{} {msg}", msg.id);
            }
            SimEvent::StatusChanged { to, .. } => {
                info!(
                    "STATE | pump={} light={} fan={} @ {}",
                    on_off(to.pump_on),
                    on_off(to.light_on),
                    on_off(to.fan_on),
                    to.last_update
                );
            }
            SimEvent::ChoreographyStarted { id } => {
                debug!("TRIP  | #{id} started");
            }
            SimEvent::ChoreographyCancelled { id } => {
                info!("TRIP  | #{id} cancelled");
            }
            SimEvent::ChoreographyCompleted { id, applied } => {
                debug!("TRIP  | #{id} completed, {applied} actuator(s) flipped");
            }
            SimEvent::ModeChanged { mode } => {
                info!("MODE  | {mode:?}");
            }
        }
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}
