//! Integration tests for the full broker round trip:
//! reading → PUBLISH sensors → DELIVER sensors → decide → PUBLISH commands
//! → DELIVER commands → actuators.

use crate::mock_sink::make_service;

use flowerpot::app::commands::AppCommand;
use flowerpot::app::events::SimEvent;
use flowerpot::broker::{Direction, MESSAGE_TRAIL_CAP, Topic};
use flowerpot::config::Mode;
use flowerpot::events::{EVENT_LOG_CAP, LogSource};
use flowerpot::sensors::{SensorField, SensorReading};
use flowerpot::time::Millis;

// ── Dry soil starts the pump ─────────────────────────────────

#[test]
fn dry_soil_turns_pump_on_after_four_hops() {
    let (mut svc, mut sink) = make_service(Mode::Broker);

    svc.handle_command(AppCommand::SetSensor(SensorField::Humidity, 20.0), Millis(0), &mut sink);
    assert!(!svc.status().pump_on, "nothing is applied before the commands arrive");

    let finished = svc.settle(&mut sink);
    assert_eq!(finished, Some(Millis(1_300)));

    let status = svc.status();
    assert!(status.pump_on);
    assert!(!status.light_on);
    assert!(!status.fan_on);
    assert_eq!(status.last_update, Millis(1_300));

    assert_eq!(svc.broker().trail().len(), 4);
    let newest = svc.log().get(0).expect("log is not empty");
    assert_eq!(newest.source, LogSource::Execution);
    assert!(newest.message.contains("启动水泵"));
}

#[test]
fn log_narrates_every_hop_in_order() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    svc.on_sensor_change(SensorReading::new(25.0, 20.0, 500.0), Millis(0), &mut sink);
    svc.settle(&mut sink);

    let mut sources: Vec<_> = svc
        .log()
        .entries()
        .map(|e| (e.source, e.timestamp.as_u64()))
        .collect();
    sources.reverse();
    assert_eq!(
        sources,
        [
            (LogSource::Sensing, 0),
            (LogSource::Broker, 0),
            (LogSource::Broker, 500),
            (LogSource::Platform, 500),
            (LogSource::Broker, 900),
            (LogSource::Broker, 1_300),
            (LogSource::Execution, 1_300),
        ]
    );
}

#[test]
fn sensor_payload_is_the_published_reading() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    svc.on_sensor_change(SensorReading::new(25.0, 20.0, 500.0), Millis(0), &mut sink);

    let first = svc.broker().messages().next().expect("publish is immediate");
    assert_eq!(first.topic, Topic::Sensors);
    assert_eq!(first.direction, Direction::Publish);
    let parsed: SensorReading = serde_json::from_str(&first.payload).unwrap();
    assert_eq!(parsed, SensorReading::new(25.0, 20.0, 500.0));
}

// ── Heat wave and cool down ──────────────────────────────────

#[test]
fn fan_follows_temperature_through_dead_band() {
    let (mut svc, mut sink) = make_service(Mode::Broker);

    svc.handle_command(AppCommand::SetSensor(SensorField::Temperature, 35.0), Millis(0), &mut sink);
    svc.settle(&mut sink);
    assert!(svc.status().fan_on);

    // Inside the band: the fan keeps running and no commands are sent.
    svc.handle_command(
        AppCommand::SetSensor(SensorField::Temperature, 28.0),
        Millis(5_000),
        &mut sink,
    );
    svc.settle(&mut sink);
    assert!(svc.status().fan_on);
    assert_eq!(svc.broker().stats().count(Topic::Commands, Direction::Publish), 1);

    svc.handle_command(
        AppCommand::SetSensor(SensorField::Temperature, 26.0),
        Millis(10_000),
        &mut sink,
    );
    svc.settle(&mut sink);
    assert!(!svc.status().fan_on);
    assert_eq!(svc.status().last_update, Millis(11_300));

    let fan_msgs: Vec<_> = svc
        .log()
        .by_source(LogSource::Execution)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(fan_msgs.len(), 2);
    assert!(fan_msgs[0].contains("关闭散热风扇"));
    assert!(fan_msgs[1].contains("开启散热风扇"));
}

#[test]
fn simultaneous_changes_apply_in_pump_light_fan_order() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    svc.on_sensor_change(SensorReading::new(40.0, 10.0, 50.0), Millis(0), &mut sink);
    svc.settle(&mut sink);

    let mut exec: Vec<_> = svc
        .log()
        .by_source(LogSource::Execution)
        .map(|e| e.message.clone())
        .collect();
    exec.reverse();
    assert_eq!(exec.len(), 3);
    assert!(exec[0].contains("水泵"));
    assert!(exec[1].contains("补光灯"));
    assert!(exec[2].contains("风扇"));
    assert_eq!(sink.status_changes().len(), 1, "one flip event per round trip");
}

// ── Bounded history ──────────────────────────────────────────

#[test]
fn history_stays_bounded_and_newest_first() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    let mut t = 0u64;
    for i in 0..30 {
        let humidity = if i % 2 == 0 { 10.0 } else { 70.0 };
        svc.handle_command(
            AppCommand::SetSensor(SensorField::Humidity, humidity),
            Millis(t),
            &mut sink,
        );
        t = svc.settle(&mut sink).map_or(t, Millis::as_u64) + 100;
    }

    assert_eq!(svc.log().len(), EVENT_LOG_CAP);
    assert_eq!(svc.broker().trail().len(), MESSAGE_TRAIL_CAP);
    assert_eq!(svc.broker().stats().total(), 120);

    let log_ids: Vec<_> = svc.log().entries().map(|e| e.id).collect();
    assert!(log_ids.windows(2).all(|w| w[0] > w[1]));
    let msg_ids: Vec<_> = svc.broker().messages().map(|m| m.id).collect();
    assert!(msg_ids.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn every_round_trip_reports_completion() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    svc.on_sensor_change(SensorReading::new(25.0, 20.0, 500.0), Millis(0), &mut sink);
    svc.settle(&mut sink);
    svc.on_sensor_change(SensorReading::new(25.0, 40.0, 500.0), Millis(2_000), &mut sink);
    svc.settle(&mut sink);

    let completed: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            SimEvent::ChoreographyCompleted { id, applied } => Some((*id, *applied)),
            _ => None,
        })
        .collect();
    assert_eq!(completed, [(1, 1), (2, 0)]);
    assert_eq!(svc.completed_count(), 2);
}
