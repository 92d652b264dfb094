//! One broker round trip as an explicit "steps remaining" value.
//!
//! ```text
//!  t0            t0+hop1          +decision          +hop2
//!  PUBLISH ─────▶ DeliverSensors ─▶ PublishCommands ─▶ DeliverCommands
//!  sensors        (decide)          commands            (apply)
//! ```
//!
//! The first publish happens synchronously when the reading arrives; a
//! [`Choreography`] holds only what is still pending.  Cancelling a round
//! trip is dropping the value: nothing else references its steps.

use crate::config::Pacing;
use crate::control::CommandSet;
use crate::sensors::SensorReading;
use crate::time::Millis;

pub type ChoreographyId = u64;

/// The next pending step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Broker forwards the sensor snapshot to the platform, which decides.
    DeliverSensors,
    /// Platform publishes the command map.
    PublishCommands(CommandSet),
    /// Broker forwards the command map to the execution module, which applies it.
    DeliverCommands(CommandSet),
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeliverSensors => "deliver-sensors",
            Self::PublishCommands(_) => "publish-commands",
            Self::DeliverCommands(_) => "deliver-commands",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choreography {
    id: ChoreographyId,
    reading: SensorReading,
    /// Serialised reading, as published.
    payload: String,
    pacing: Pacing,
    step: Step,
    due_at: Millis,
}

impl Choreography {
    /// Schedule the remainder of a round trip whose sensor publish
    /// happened at `published_at`.
    pub fn after_publish(
        id: ChoreographyId,
        reading: SensorReading,
        payload: String,
        pacing: Pacing,
        published_at: Millis,
    ) -> Self {
        Self {
            id,
            reading,
            payload,
            pacing,
            step: Step::DeliverSensors,
            due_at: published_at + pacing.sensor_hop_ms,
        }
    }

    pub fn id(&self) -> ChoreographyId {
        self.id
    }

    pub fn reading(&self) -> &SensorReading {
        &self.reading
    }

    pub fn sensor_payload(&self) -> &str {
        &self.payload
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn due_at(&self) -> Millis {
        self.due_at
    }

    pub fn is_due(&self, now: Millis) -> bool {
        self.due_at <= now
    }

    /// Move on to publishing `commands` after the decision delay.
    pub fn then_publish(self, commands: CommandSet) -> Self {
        let due_at = self.due_at + self.pacing.decision_ms;
        Self {
            step: Step::PublishCommands(commands),
            due_at,
            ..self
        }
    }

    /// Move on to delivering `commands` after the command hop delay.
    pub fn then_deliver(self, commands: CommandSet) -> Self {
        let due_at = self.due_at + self.pacing.command_hop_ms;
        Self {
            step: Step::DeliverCommands(commands),
            due_at,
            ..self
        }
    }
}
