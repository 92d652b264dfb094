//! Simulation configuration parameters
//!
//! All tunable parameters for the flowerpot simulation.  Defaults reproduce
//! the classroom reference behaviour; the demo binary overlays a couple of
//! environment variables on top (see [`SimConfig::from_env`]).

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sensors::SensorReading;

/// Environment variable selecting the orchestration mode (`broker` | `direct`).
pub const ENV_MODE: &str = "FLOWERPOT_MODE";
/// Environment variable scaling every pacing delay, in percent.
pub const ENV_PACING_SCALE: &str = "FLOWERPOT_PACING_SCALE";

/// How sensor changes reach the actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every change travels through the simulated broker with artificial delays.
    #[default]
    Broker,
    /// Reduced mode: broker hops skipped, rules applied immediately.
    Direct,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "broker" | "mqtt" => Some(Self::Broker),
            "direct" => Some(Self::Direct),
            _ => None,
        }
    }
}

/// Hysteresis thresholds for the three actuators.
///
/// Each actuator has an ON edge and an OFF edge; the gap between them is the
/// dead band in which the current state is held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    // --- Pump (soil humidity, %) ---
    /// Pump turns on when humidity drops strictly below this.
    pub pump_on_humidity_below: f32,
    /// Pump turns off when humidity reaches or exceeds this.
    pub pump_off_humidity_at: f32,

    // --- Grow light (lux) ---
    /// Light turns on when illuminance drops strictly below this.
    pub light_on_lux_below: f32,
    /// Light turns off when illuminance rises strictly above this.
    pub light_off_lux_above: f32,

    // --- Fan (°C) ---
    /// Fan turns on when temperature rises strictly above this.
    pub fan_on_temp_above: f32,
    /// Fan turns off when temperature falls to or below this.
    pub fan_off_temp_at: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pump_on_humidity_below: 30.0,
            pump_off_humidity_at: 50.0,
            light_on_lux_below: 200.0,
            light_off_lux_above: 600.0,
            fan_on_temp_above: 30.0,
            fan_off_temp_at: 27.0,
        }
    }
}

/// Artificial broker delays (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// Sensor publish → delivery to the platform.
    pub sensor_hop_ms: u32,
    /// Platform decision → command publish.
    pub decision_ms: u32,
    /// Command publish → delivery to the execution module.
    pub command_hop_ms: u32,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            sensor_hop_ms: 500,
            decision_ms: 400,
            command_hop_ms: 400,
        }
    }
}

impl Pacing {
    /// Scale every delay by `percent` (100 = unchanged, 0 = no delay).
    pub fn scaled(self, percent: u32) -> Self {
        let scale = |ms: u32| {
            (u64::from(ms) * u64::from(percent) / 100).min(u64::from(u32::MAX)) as u32
        };
        Self {
            sensor_hop_ms: scale(self.sensor_hop_ms),
            decision_ms: scale(self.decision_ms),
            command_hop_ms: scale(self.command_hop_ms),
        }
    }

    /// Total time from a sensor publish to the command being applied.
    pub fn total_ms(&self) -> u64 {
        u64::from(self.sensor_hop_ms) + u64::from(self.decision_ms) + u64::from(self.command_hop_ms)
    }
}

/// Settings for the optional AI narration collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// Model identifier passed to the remote API.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            model: String::from("gemini-3-flash-preview"),
            api_key_env: String::from("API_KEY"),
            timeout_secs: 10,
        }
    }
}

/// Core simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub mode: Mode,
    pub thresholds: Thresholds,
    pub pacing: Pacing,
    /// Reading shown before the first slider move.
    pub initial_reading: SensorReading,
    pub narration: NarrationConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Broker,
            thresholds: Thresholds::default(),
            pacing: Pacing::default(),
            initial_reading: SensorReading::new(25.0, 45.0, 500.0),
            narration: NarrationConfig::default(),
        }
    }
}

impl SimConfig {
    /// Defaults overlaid with `FLOWERPOT_MODE` and `FLOWERPOT_PACING_SCALE`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mode = std::env::var(ENV_MODE).ok();
        let scale = std::env::var(ENV_PACING_SCALE).ok();
        Self::with_overrides(mode.as_deref(), scale.as_deref())
    }

    /// Defaults overlaid with raw mode and pacing-scale strings.
    pub fn with_overrides(mode: Option<&str>, pacing_scale: Option<&str>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = mode {
            match Mode::parse(raw) {
                Some(mode) => config.mode = mode,
                None => warn!("{ENV_MODE}={raw:?} not recognised, keeping {:?}", config.mode),
            }
        }

        if let Some(raw) = pacing_scale {
            match raw.trim().parse::<u32>() {
                Ok(pct) => config.pacing = config.pacing.scaled(pct),
                Err(e) => warn!("{ENV_PACING_SCALE}={raw:?} ignored: {e}"),
            }
        }

        config
    }

    /// Reject thresholds without a dead band.
    ///
    /// A band where the ON edge sits past the OFF edge would toggle the
    /// actuator on every evaluation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let all = [
            t.pump_on_humidity_below,
            t.pump_off_humidity_at,
            t.light_on_lux_below,
            t.light_off_lux_above,
            t.fan_on_temp_above,
            t.fan_off_temp_at,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::ValidationFailed("thresholds must be finite"));
        }
        if t.pump_on_humidity_below > t.pump_off_humidity_at {
            return Err(ConfigError::ValidationFailed(
                "pump ON humidity must not exceed pump OFF humidity",
            ));
        }
        if t.light_on_lux_below > t.light_off_lux_above {
            return Err(ConfigError::ValidationFailed(
                "light ON lux must not exceed light OFF lux",
            ));
        }
        if t.fan_off_temp_at > t.fan_on_temp_above {
            return Err(ConfigError::ValidationFailed(
                "fan OFF temperature must not exceed fan ON temperature",
            ));
        }
        Ok(())
    }
}
