//! Sensor subsystem: the three simulated environmental readings.
//!
//! There are no drivers here: readings come from the classroom input surface
//! (slider drags).  [`SensorState`] keeps the latest [`SensorReading`] and is
//! the only place it is mutated.

use serde::{Deserialize, Serialize};

/// Temperature domain (°C).
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 50.0);
/// Soil humidity domain (%).
pub const HUMIDITY_RANGE: (f32, f32) = (0.0, 100.0);
/// Illuminance domain (lux).
pub const LIGHT_RANGE: (f32, f32) = (0.0, 1000.0);

/// A point-in-time snapshot of every sensor in the pot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorReading {
    /// Ambient temperature (°C).
    pub temperature: f32,
    /// Soil humidity (%).
    pub humidity: f32,
    /// Illuminance (lux).
    pub light: f32,
}

impl SensorReading {
    pub const fn new(temperature: f32, humidity: f32, light: f32) -> Self {
        Self {
            temperature,
            humidity,
            light,
        }
    }

    /// Clamp every field into its domain.
    ///
    /// NaN passes through unchanged; every threshold comparison against NaN
    /// is false, so it never fires a rule.
    pub fn clamped(self) -> Self {
        Self {
            temperature: clamp(self.temperature, TEMPERATURE_RANGE),
            humidity: clamp(self.humidity, HUMIDITY_RANGE),
            light: clamp(self.light, LIGHT_RANGE),
        }
    }
}

fn clamp(value: f32, (lo, hi): (f32, f32)) -> f32 {
    value.clamp(lo, hi)
}

/// Which slider moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorField {
    Temperature,
    Humidity,
    Light,
}

/// Holder of the current reading.
#[derive(Debug, Clone)]
pub struct SensorState {
    current: SensorReading,
}

impl SensorState {
    pub fn new(initial: SensorReading) -> Self {
        Self {
            current: initial.clamped(),
        }
    }

    pub fn current(&self) -> SensorReading {
        self.current
    }

    /// Replace the whole reading.  Returns the stored (clamped) value.
    pub fn replace(&mut self, reading: SensorReading) -> SensorReading {
        self.current = reading.clamped();
        self.current
    }

    /// Update a single field, keeping the other two.  Returns the full
    /// reading after the update.
    pub fn set_field(&mut self, field: SensorField, value: f32) -> SensorReading {
        let mut next = self.current;
        match field {
            SensorField::Temperature => next.temperature = value,
            SensorField::Humidity => next.humidity = value,
            SensorField::Light => next.light = value,
        }
        self.replace(next)
    }
}
