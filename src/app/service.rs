//! Application service: the orchestrator of the simulation.
//!
//! [`FlowerpotService`] owns the sensor state, actuator status, event log,
//! simulated broker and the in-flight broker round trip.  It exposes one
//! event-driven entry point, [`on_sensor_change`], plus [`advance`] for the
//! passage of time.  All output flows through an [`EventSink`] injected at
//! call sites, making the whole service testable with a recording sink.
//!
//! ```text
//!  input ──▶ on_sensor_change ──▶ ┌───────────────────────────┐ ──▶ EventSink
//!                                 │      FlowerpotService     │
//!  clock ──▶ advance(now) ──────▶ │ Broker · Controller · Log │
//!                                 └───────────────────────────┘
//! ```
//!
//! Time is always passed in.  A step that is due at `t` runs with timestamp
//! `t` even if `advance` is called later, so the log reads the same no
//! matter how coarse the caller's polling is.
//!
//! [`on_sensor_change`]: FlowerpotService::on_sensor_change
//! [`advance`]: FlowerpotService::advance

use log::{debug, info, warn};
use serde::Serialize;

use crate::broker::{
    BrokerMessage, EXECUTION_MODULE, PLATFORM, SENSING_MODULE, SimulatedBroker, Topic,
};
use crate::config::{Mode, SimConfig};
use crate::control::{ActuatorController, ActuatorStatus, CommandSet};
use crate::error::Result;
use crate::events::{EventLog, LogSource};
use crate::narration;
use crate::sensors::{SensorReading, SensorState};
use crate::time::Millis;

use super::choreography::{Choreography, ChoreographyId, Step};
use super::commands::AppCommand;
use super::events::{SimEvent, Snapshot};
use super::ports::{EventSink, NarrationPort};

/// Log text when a newer reading drops a pending round trip.
pub const CANCELLED_MESSAGE: &str = "收到新的传感器数据，已取消上一轮未完成的指令传递";

// ───────────────────────────────────────────────────────────────
// FlowerpotService
// ───────────────────────────────────────────────────────────────

pub struct FlowerpotService {
    config: SimConfig,
    controller: ActuatorController,
    sensors: SensorState,
    status: ActuatorStatus,
    log: EventLog,
    broker: SimulatedBroker,
    /// Pending steps of the most recent round trip, if any.
    in_flight: Option<Choreography>,
    next_choreography_id: ChoreographyId,
    cancelled: u64,
    completed: u64,
}

impl FlowerpotService {
    /// Construct the service from configuration, all actuators off.
    pub fn new(config: SimConfig, now: Millis) -> Result<Self> {
        config.validate()?;
        info!(
            "FlowerpotService starting in {:?} mode (round trip {} ms)",
            config.mode,
            config.pacing.total_ms()
        );
        Ok(Self {
            controller: ActuatorController::new(config.thresholds),
            sensors: SensorState::new(config.initial_reading),
            status: ActuatorStatus::all_off(now),
            log: EventLog::new(),
            broker: SimulatedBroker::new(),
            in_flight: None,
            next_choreography_id: 1,
            cancelled: 0,
            completed: 0,
            config,
        })
    }

    // ── Input ─────────────────────────────────────────────────

    /// React to a new reading from the input surface.
    ///
    /// Steps of the previous round trip already due at `now` run first;
    /// whatever is still pending after that is cancelled before the new
    /// reading is processed.
    pub fn on_sensor_change(
        &mut self,
        reading: SensorReading,
        now: Millis,
        sink: &mut impl EventSink,
    ) -> SensorReading {
        self.advance(now, sink);
        self.cancel_in_flight(now, sink);

        let reading = self.sensors.replace(reading);
        debug!(
            "Sensors: T={}°C H={}% L={}lux",
            reading.temperature, reading.humidity, reading.light
        );
        sink.emit(&SimEvent::SensorsChanged(reading));
        self.log_entry(LogSource::Sensing, sensing_message(&reading), now, sink);

        match self.config.mode {
            Mode::Broker => self.start_choreography(reading, now, sink),
            Mode::Direct => self.apply_directly(reading, now, sink),
        }
        reading
    }

    /// Process an external command.
    pub fn handle_command(&mut self, cmd: AppCommand, now: Millis, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::SensorChanged(reading) => {
                self.on_sensor_change(reading, now, sink);
            }
            AppCommand::SetSensor(field, value) => {
                let mut staged = self.sensors.clone();
                let reading = staged.set_field(field, value);
                self.on_sensor_change(reading, now, sink);
            }
            AppCommand::SetMode(mode) => {
                if mode != self.config.mode {
                    self.advance(now, sink);
                    self.cancel_in_flight(now, sink);
                    self.config.mode = mode;
                    info!("Mode switched to {:?}", mode);
                    sink.emit(&SimEvent::ModeChanged { mode });
                }
            }
        }
    }

    // ── Time ──────────────────────────────────────────────────

    /// Run every pending step due at or before `now`.  Returns how many
    /// steps ran.
    pub fn advance(&mut self, now: Millis, sink: &mut impl EventSink) -> usize {
        let mut ran = 0;
        while let Some(ch) = self.in_flight.take() {
            if !ch.is_due(now) {
                self.in_flight = Some(ch);
                break;
            }
            ran += 1;
            self.in_flight = self.run_step(ch, sink);
        }
        ran
    }

    /// Run the in-flight round trip to its end, each step at its own due
    /// time.  Returns the time of the last step, if any ran.
    pub fn settle(&mut self, sink: &mut impl EventSink) -> Option<Millis> {
        let mut last = None;
        while let Some(due) = self.next_deadline() {
            self.advance(due, sink);
            last = Some(due);
        }
        last
    }

    /// When the next pending step is due, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.in_flight.as_ref().map(Choreography::due_at)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn reading(&self) -> SensorReading {
        self.sensors.current()
    }

    pub fn status(&self) -> ActuatorStatus {
        self.status
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn broker(&self) -> &SimulatedBroker {
        &self.broker
    }

    /// Round trips dropped in favour of a newer reading.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }

    /// Round trips that ran to their end.
    pub fn completed_count(&self) -> u64 {
        self.completed
    }

    /// Everything the renderer needs for one frame.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.config.mode,
            reading: self.sensors.current(),
            status: self.status,
            log: self.log.to_vec(),
            messages: self.broker.trail().to_vec(),
            broker_stats: self.broker.stats(),
            in_flight: self.in_flight.is_some(),
            cancelled_choreographies: self.cancelled,
        }
    }

    /// Advisory text for the current reading; never fails.
    pub fn narrate(&self, port: &mut impl NarrationPort) -> String {
        narration::narrate(port, &self.sensors.current())
    }

    // ── Internal ──────────────────────────────────────────────

    fn cancel_in_flight(&mut self, now: Millis, sink: &mut impl EventSink) {
        if let Some(stale) = self.in_flight.take() {
            self.cancelled += 1;
            info!(
                "Choreography #{} cancelled before {}",
                stale.id(),
                stale.step().name()
            );
            sink.emit(&SimEvent::ChoreographyCancelled { id: stale.id() });
            self.log_entry(LogSource::Communication, CANCELLED_MESSAGE, now, sink);
        }
    }

    /// Reduced mode: no broker hops, rules applied immediately.
    fn apply_directly(&mut self, reading: SensorReading, now: Millis, sink: &mut impl EventSink) {
        let decision = self.controller.decide(&reading, &self.status, now);
        if decision.is_noop() {
            return;
        }
        let before = self.status;
        self.status = decision.next;
        for change in &decision.changes {
            self.log_entry(LogSource::Execution, change.message, now, sink);
        }
        sink.emit(&SimEvent::StatusChanged {
            from: before,
            to: self.status,
        });
    }

    /// Step 1: publish the reading, then schedule the rest.
    fn start_choreography(
        &mut self,
        reading: SensorReading,
        now: Millis,
        sink: &mut impl EventSink,
    ) {
        let id = self.next_choreography_id;
        self.next_choreography_id += 1;

        let payload = to_payload(&reading);
        self.route(
            |broker, log| broker.publish(Topic::Sensors, payload.clone(), SENSING_MODULE, now, log),
            sink,
        );

        let ch = Choreography::after_publish(id, reading, payload, self.config.pacing, now);
        debug!("Choreography #{id} scheduled, next step at {}", ch.due_at().as_u64());
        sink.emit(&SimEvent::ChoreographyStarted { id });
        self.in_flight = Some(ch);
    }

    /// Execute the pending step of `ch`; returns the continuation, if any.
    fn run_step(&mut self, ch: Choreography, sink: &mut impl EventSink) -> Option<Choreography> {
        let at = ch.due_at();
        match ch.step().clone() {
            Step::DeliverSensors => {
                let payload = ch.sensor_payload().to_owned();
                self.route(
                    |broker, log| broker.deliver(Topic::Sensors, payload, PLATFORM, at, log),
                    sink,
                );

                // Decide against the status as it is now; nothing is mutated
                // until the commands reach the execution module.
                let commands = self.controller.decide(ch.reading(), &self.status, at).commands();
                if commands.is_empty() {
                    debug!("Choreography #{}: no actuator change needed", ch.id());
                    self.finish(&ch, 0, sink);
                    return None;
                }
                self.log_entry(
                    LogSource::Platform,
                    format!("分析传感器数据，生成 {} 条控制指令", commands.len()),
                    at,
                    sink,
                );
                Some(ch.then_publish(commands))
            }
            Step::PublishCommands(commands) => {
                let payload = to_payload(&commands);
                self.route(
                    |broker, log| broker.publish(Topic::Commands, payload, PLATFORM, at, log),
                    sink,
                );
                Some(ch.then_deliver(commands))
            }
            Step::DeliverCommands(commands) => {
                let payload = to_payload(&commands);
                self.route(
                    |broker, log| {
                        broker.deliver(Topic::Commands, payload, EXECUTION_MODULE, at, log)
                    },
                    sink,
                );
                let applied = self.apply_commands(&commands, at, sink);
                self.finish(&ch, applied, sink);
                None
            }
        }
    }

    /// Step 5: flip exactly the named actuators and log each flip.
    fn apply_commands(
        &mut self,
        commands: &CommandSet,
        at: Millis,
        sink: &mut impl EventSink,
    ) -> usize {
        let before = self.status;
        let flipped = self.status.apply(commands, at);
        for change in &flipped {
            info!(
                "Actuator {} -> {}",
                change.actuator.name(),
                if change.on { "ON" } else { "OFF" }
            );
            self.log_entry(LogSource::Execution, change.message, at, sink);
        }
        if !flipped.is_empty() {
            sink.emit(&SimEvent::StatusChanged {
                from: before,
                to: self.status,
            });
        }
        flipped.len()
    }

    fn finish(&mut self, ch: &Choreography, applied: usize, sink: &mut impl EventSink) {
        self.completed += 1;
        sink.emit(&SimEvent::ChoreographyCompleted { id: ch.id(), applied });
    }

    /// Run a broker operation and emit both the routed message and the
    /// log entry the broker wrote.
    fn route(
        &mut self,
        op: impl FnOnce(&mut SimulatedBroker, &mut EventLog) -> BrokerMessage,
        sink: &mut impl EventSink,
    ) {
        let mark = self.log.next_id();
        let msg = op(&mut self.broker, &mut self.log);
        self.emit_log_since(mark, sink);
        sink.emit(&SimEvent::MessageRouted(msg));
    }

    fn log_entry(
        &mut self,
        source: LogSource,
        message: impl Into<String>,
        at: Millis,
        sink: &mut impl EventSink,
    ) {
        let entry = self.log.record(source, message, at);
        sink.emit(&SimEvent::LogAppended(entry));
    }

    fn emit_log_since(&self, mark: u64, sink: &mut impl EventSink) {
        let mut fresh: Vec<_> = self.log.entries().take_while(|e| e.id >= mark).collect();
        fresh.reverse();
        for entry in fresh {
            sink.emit(&SimEvent::LogAppended(entry.clone()));
        }
    }
}

/// Log text for a freshly sampled reading.
fn sensing_message(r: &SensorReading) -> String {
    format!(
        "采集到新数据：温度 {}°C，土壤湿度 {}%，光照强度 {}Lux",
        r.temperature, r.humidity, r.light
    )
}

/// JSON payload for a broker message.
fn to_payload(value: &impl Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!("Payload serialisation failed: {e}");
        String::from("{}")
    })
}
