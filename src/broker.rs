//! Simulated MQTT broker.
//!
//! An in-process stand-in for a publish/subscribe broker.  Nothing travels
//! over a network: each hop is recorded as a [`BrokerMessage`] in a bounded
//! trail (20 messages, newest first) and narrated into the [`EventLog`].
//!
//! ```text
//!  publisher ──PUBLISH──▶ ┌──────────────┐ ──DELIVER──▶ subscriber
//!                         │    Broker    │
//!                         │  trail (20)  │
//!                         └──────────────┘
//! ```
//!
//! Delays between the two directions are the orchestrator's business; the
//! broker only records hops.

use core::fmt;

use log::debug;
use serde::Serialize;

use crate::events::{EventLog, LogSource};
use crate::ring::NewestFirstRing;
use crate::time::Millis;

/// Maximum number of retained broker messages.
pub const MESSAGE_TRAIL_CAP: usize = 20;

/// Actor label of the sensing module (sensor publisher).
pub const SENSING_MODULE: &str = "sensing module";
/// Actor label of the service platform (sensor subscriber, command publisher).
pub const PLATFORM: &str = "platform";
/// Actor label of the execution module (command subscriber).
pub const EXECUTION_MODULE: &str = "execution module";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// Sensor snapshots from the pot.
    Sensors,
    /// Actuator command maps from the platform.
    Commands,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sensors => "sensors",
            Self::Commands => "commands",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Sensors => 0,
            Self::Commands => 1,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sender → broker.
    Publish,
    /// Broker → subscriber.
    Deliver,
}

impl Direction {
    /// Badge text shown in the broker panel.
    pub fn badge(self) -> &'static str {
        match self {
            Self::Publish => "PUBLISH",
            Self::Deliver => "DELIVER",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Publish => 0,
            Self::Deliver => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokerMessage {
    pub id: u64,
    pub topic: Topic,
    /// JSON snapshot of a sensor reading or command map.
    pub payload: String,
    /// Originating actor label.
    pub from: String,
    pub direction: Direction,
    pub timestamp: Millis,
}

impl fmt::Display for BrokerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from={} topic={} payload={}",
            self.direction.badge(),
            self.from,
            self.topic,
            self.payload
        )
    }
}

/// Hop counters, per topic and direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BrokerStats {
    counts: [[u64; 2]; 2],
}

impl BrokerStats {
    pub fn count(&self, topic: Topic, direction: Direction) -> u64 {
        self.counts[topic.index()][direction.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    fn bump(&mut self, topic: Topic, direction: Direction) {
        self.counts[topic.index()][direction.index()] += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedBroker {
    trail: NewestFirstRing<BrokerMessage, MESSAGE_TRAIL_CAP>,
    next_id: u64,
    stats: BrokerStats,
}

impl SimulatedBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sender emitting `payload` on `topic`.
    pub fn publish(
        &mut self,
        topic: Topic,
        payload: impl Into<String>,
        from: &str,
        at: Millis,
        log: &mut EventLog,
    ) -> BrokerMessage {
        log.record(
            LogSource::Broker,
            format!("received from {from} on topic {topic}"),
            at,
        );
        self.record(topic, payload.into(), from, Direction::Publish, at)
    }

    /// Record the broker forwarding `payload` on `topic` to its subscriber.
    pub fn deliver(
        &mut self,
        topic: Topic,
        payload: impl Into<String>,
        from: &str,
        at: Millis,
        log: &mut EventLog,
    ) -> BrokerMessage {
        log.record(
            LogSource::Broker,
            format!("forwarded to subscribers on topic {topic}"),
            at,
        );
        self.record(topic, payload.into(), from, Direction::Deliver, at)
    }

    /// Messages, newest first.
    pub fn messages(&self) -> impl Iterator<Item = &BrokerMessage> + '_ {
        self.trail.entries()
    }

    pub fn trail(&self) -> &NewestFirstRing<BrokerMessage, MESSAGE_TRAIL_CAP> {
        &self.trail
    }

    pub fn stats(&self) -> BrokerStats {
        self.stats
    }

    fn record(
        &mut self,
        topic: Topic,
        payload: String,
        from: &str,
        direction: Direction,
        at: Millis,
    ) -> BrokerMessage {
        let msg = BrokerMessage {
            id: self.next_id,
            topic,
            payload,
            from: from.to_owned(),
            direction,
            timestamp: at,
        };
        self.next_id += 1;
        self.stats.bump(topic, direction);
        debug!("Broker: {msg}");
        self.trail.append(msg.clone());
        msg
    }
}
