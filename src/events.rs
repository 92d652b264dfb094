//! Human-readable event log.
//!
//! Every decision, broker hop and actuator action is recorded here for the
//! classroom log terminal.  The log keeps the 15 most recent entries, newest
//! first.
//!
//! ```text
//! ┌──────────────┐
//! │ Sensing      │──┐
//! │ Broker       │──┤     ┌───────────────┐     ┌──────────────┐
//! │ Platform     │──┼────▶│  EventLog(15) │────▶│  Renderer    │
//! │ Execution    │──┘     └───────────────┘     └──────────────┘
//! └──────────────┘
//! ```

use core::fmt;

use serde::Serialize;

use crate::ring::NewestFirstRing;
use crate::time::Millis;

/// Maximum number of retained log entries.
pub const EVENT_LOG_CAP: usize = 15;

/// Which part of the IoT system produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogSource {
    Sensing,
    Communication,
    Platform,
    Execution,
    Broker,
}

impl LogSource {
    /// Stable machine tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Sensing => "SENSING",
            Self::Communication => "COMMUNICATION",
            Self::Platform => "PLATFORM",
            Self::Execution => "EXECUTION",
            Self::Broker => "BROKER",
        }
    }

    /// Label shown in the classroom UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sensing => "环境感知模块",
            Self::Communication => "网络通信模块",
            Self::Platform => "服务平台模块",
            Self::Execution => "执行模块",
            Self::Broker => "MQTT Broker",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventLogEntry {
    /// Unique within one log, increasing with insertion order.
    pub id: u64,
    pub source: LogSource,
    pub message: String,
    pub timestamp: Millis,
}

impl fmt::Display for EventLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] {}", self.timestamp, self.source.label(), self.message)
    }
}

/// Bounded, newest-first log of [`EventLogEntry`]s.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    ring: NewestFirstRing<EventLogEntry, EVENT_LOG_CAP>,
    next_id: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and append an entry, returning a copy of it.
    pub fn record(
        &mut self,
        source: LogSource,
        message: impl Into<String>,
        at: Millis,
    ) -> EventLogEntry {
        let entry = EventLogEntry {
            id: self.next_id,
            source,
            message: message.into(),
            timestamp: at,
        };
        self.next_id += 1;
        self.ring.append(entry.clone());
        entry
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &EventLogEntry> + '_ {
        self.ring.entries()
    }

    pub fn get(&self, index: usize) -> Option<&EventLogEntry> {
        self.ring.get(index)
    }

    /// Id the next recorded entry will get.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn to_vec(&self) -> Vec<EventLogEntry> {
        self.ring.to_vec()
    }

    /// Entries from one source, newest first.
    pub fn by_source(&self, source: LogSource) -> impl Iterator<Item = &EventLogEntry> + '_ {
        self.entries().filter(move |e| e.source == source)
    }
}
