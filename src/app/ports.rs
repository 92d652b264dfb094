//! Port traits: the hexagonal boundary between the simulation core and the
//! outside world.
//!
//! ```text
//!   Input surface ──▶ AppService ──▶ EventSink  (renderer, log, …)
//!                        │
//!                        ├──▶ Clock          (host timer / test clock)
//!                        └──▶ NarrationPort  (optional AI advisor)
//! ```
//!
//! The [`FlowerpotService`](super::service::FlowerpotService) consumes these
//! via generics, so the core never touches a clock, terminal or network
//! directly.

use crate::error::NarrationError;
use crate::sensors::SensorReading;
use crate::time::Millis;

// ───────────────────────────────────────────────────────────────
// Event sink port (core → renderer / logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`SimEvent`](super::events::SimEvent)s
/// through this port.  Adapters decide where they go (log output, a UI
/// re-render, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::SimEvent);
}

/// Sink that drops everything.
impl EventSink for () {
    fn emit(&mut self, _event: &super::events::SimEvent) {}
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic simulation time.
pub trait Clock {
    fn now(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Narration port (optional AI advisor)
// ───────────────────────────────────────────────────────────────

/// Turns a reading into a short natural-language advisory.
///
/// Implementations may fail (network, credentials, quota); callers go
/// through [`narrate`](crate::narration::narrate), which converts any
/// failure into a fixed fallback string.
pub trait NarrationPort {
    fn advise(&mut self, reading: &SensorReading) -> Result<String, NarrationError>;
}
