//! Inbound commands to the application service.
//!
//! These represent actions requested by the input surface (slider drags,
//! a mode toggle) that the [`FlowerpotService`](super::service::FlowerpotService)
//! interprets and acts upon.

use crate::config::Mode;
use crate::sensors::{SensorField, SensorReading};

/// Commands that the input surface can send into the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Replace the whole reading.
    SensorChanged(SensorReading),

    /// One slider moved; the other two readings are kept.
    SetSensor(SensorField, f32),

    /// Switch between broker and direct orchestration.
    SetMode(Mode),
}
