//! Flowerpot classroom demo: main entry point.
//!
//! Plays a scripted lesson against the simulation in real time and logs
//! every hop of every round trip.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  HostClock (Clock)   LogEventSink (EventSink)              │
//! │  RuleBasedNarrator / GeminiNarrator (NarrationPort)        │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ────────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │        FlowerpotService (pure logic)                 │  │
//! │  │  Broker · Controller · EventLog                      │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                                                            │
//! │  runtime::run_script (edge-executor + async-io-mini)       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Environment: `RUST_LOG`, `FLOWERPOT_MODE` (`broker` | `direct`),
//! `FLOWERPOT_PACING_SCALE` (percent), plus `API_KEY` with the `gemini`
//! feature.

use anyhow::Result;
use log::info;

use flowerpot::adapters::log_sink::LogEventSink;
use flowerpot::adapters::time::HostClock;
use flowerpot::app::commands::AppCommand;
use flowerpot::app::ports::Clock;
use flowerpot::app::service::FlowerpotService;
use flowerpot::broker::{Direction, Topic};
use flowerpot::config::{Mode, SimConfig};
use flowerpot::runtime::{Cue, run_script};
use flowerpot::sensors::{SensorField, SensorReading};

/// The lesson: dry soil, a dark evening, a heat wave that cools off, and
/// a student who drags a slider twice in quick succession.
fn lesson() -> Vec<Cue> {
    use AppCommand::{SensorChanged, SetMode, SetSensor};
    vec![
        Cue::after_ms(0, SetSensor(SensorField::Humidity, 20.0)),
        Cue::after_ms(2_000, SetSensor(SensorField::Humidity, 55.0)),
        Cue::after_ms(2_000, SetSensor(SensorField::Light, 150.0)),
        Cue::after_ms(2_000, SensorChanged(SensorReading::new(35.0, 55.0, 700.0))),
        Cue::after_ms(2_000, SetSensor(SensorField::Temperature, 28.0)),
        Cue::after_ms(2_000, SetSensor(SensorField::Temperature, 26.0)),
        // Second drag lands mid round trip and cancels the first.
        Cue::after_ms(2_000, SetSensor(SensorField::Humidity, 10.0)),
        Cue::after_ms(300, SetSensor(SensorField::Humidity, 60.0)),
        Cue::after_ms(2_000, SetMode(Mode::Direct)),
        Cue::after_ms(200, SetSensor(SensorField::Humidity, 15.0)),
    ]
}

#[cfg(feature = "gemini")]
fn narrate(service: &FlowerpotService) -> String {
    use flowerpot::adapters::gemini::GeminiNarrator;
    use flowerpot::narration::NARRATION_FALLBACK;

    match GeminiNarrator::from_config(&service.config().narration) {
        Ok(mut narrator) => service.narrate(&mut narrator),
        Err(e) => {
            log::warn!("Gemini narrator unavailable: {e}");
            NARRATION_FALLBACK.to_owned()
        }
    }
}

#[cfg(not(feature = "gemini"))]
fn narrate(service: &FlowerpotService) -> String {
    use flowerpot::narration::RuleBasedNarrator;

    let mut narrator = RuleBasedNarrator::new(service.config().thresholds);
    service.narrate(&mut narrator)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  Flowerpot v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SimConfig::from_env();
    let clock = HostClock::new();
    let mut service = FlowerpotService::new(config, clock.now())?;
    let mut sink = LogEventSink::new();

    run_script(&mut service, &lesson(), &clock, &mut sink);

    let snapshot = service.snapshot();
    info!("Final state: {}", serde_json::to_string(&snapshot.status)?);
    info!(
        "Broker: {} hops ({} sensor publishes, {} command deliveries), {} round trips cancelled",
        snapshot.broker_stats.total(),
        snapshot.broker_stats.count(Topic::Sensors, Direction::Publish),
        snapshot.broker_stats.count(Topic::Commands, Direction::Deliver),
        snapshot.cancelled_choreographies
    );
    for entry in service.log().entries() {
        info!("  {entry}");
    }
    info!("Advisor: {}", narrate(&service));
    Ok(())
}
