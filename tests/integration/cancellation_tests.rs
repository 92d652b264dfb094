//! Integration tests for superseding an in-flight round trip.
//!
//! Only the newest reading may reach the actuators; stale steps are
//! dropped the moment a newer reading arrives.

use crate::mock_sink::make_service;

use flowerpot::app::commands::AppCommand;
use flowerpot::app::service::CANCELLED_MESSAGE;
use flowerpot::broker::{Direction, Topic};
use flowerpot::config::Mode;
use flowerpot::events::LogSource;
use flowerpot::sensors::{SensorField, SensorReading};
use flowerpot::time::Millis;

#[test]
fn quick_second_change_wins() {
    let (mut svc, mut sink) = make_service(Mode::Broker);

    // Dry soil, then a heat wave before the pump command is delivered.
    svc.on_sensor_change(SensorReading::new(25.0, 20.0, 500.0), Millis(0), &mut sink);
    svc.on_sensor_change(SensorReading::new(35.0, 60.0, 500.0), Millis(200), &mut sink);
    svc.settle(&mut sink);

    let status = svc.status();
    assert!(!status.pump_on, "stale pump command must never be applied");
    assert!(status.fan_on);
    assert_eq!(status.last_update, Millis(1_500));
    assert_eq!(svc.cancelled_count(), 1);
    assert_eq!(sink.cancelled(), 1);
    assert_eq!(sink.status_changes().len(), 1);
}

#[test]
fn cancellation_is_logged() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    svc.on_sensor_change(SensorReading::new(25.0, 20.0, 500.0), Millis(0), &mut sink);
    svc.on_sensor_change(SensorReading::new(25.0, 45.0, 500.0), Millis(100), &mut sink);

    let cancelled: Vec<_> = svc.log().by_source(LogSource::Communication).collect();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].message, CANCELLED_MESSAGE);
    assert_eq!(cancelled[0].timestamp, Millis(100));
}

#[test]
fn steps_due_at_the_new_reading_still_run() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    svc.on_sensor_change(SensorReading::new(25.0, 20.0, 500.0), Millis(0), &mut sink);

    // Sensor delivery of the first trip is due exactly now.
    svc.on_sensor_change(SensorReading::new(25.0, 45.0, 500.0), Millis(500), &mut sink);

    assert_eq!(svc.broker().stats().count(Topic::Sensors, Direction::Deliver), 1);
    assert_eq!(svc.log().by_source(LogSource::Platform).count(), 1);
    assert_eq!(svc.broker().stats().count(Topic::Commands, Direction::Publish), 0);
    assert_eq!(svc.cancelled_count(), 1);
}

#[test]
fn cancel_after_command_publish_drops_delivery() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    svc.on_sensor_change(SensorReading::new(25.0, 20.0, 500.0), Millis(0), &mut sink);
    svc.advance(Millis(1_000), &mut sink);
    assert_eq!(svc.broker().stats().count(Topic::Commands, Direction::Publish), 1);

    svc.handle_command(
        AppCommand::SetSensor(SensorField::Humidity, 40.0),
        Millis(1_100),
        &mut sink,
    );
    svc.settle(&mut sink);

    assert!(!svc.status().pump_on);
    assert_eq!(svc.broker().stats().count(Topic::Commands, Direction::Deliver), 0);
    assert_eq!(svc.log().by_source(LogSource::Execution).count(), 0);
}

#[test]
fn burst_of_changes_applies_only_the_last() {
    let (mut svc, mut sink) = make_service(Mode::Broker);
    for (i, humidity) in [10.0, 15.0, 20.0, 25.0, 55.0].into_iter().enumerate() {
        svc.handle_command(
            AppCommand::SetSensor(SensorField::Humidity, humidity),
            Millis(i as u64 * 50),
            &mut sink,
        );
    }
    svc.settle(&mut sink);

    assert!(!svc.status().pump_on);
    assert_eq!(svc.cancelled_count(), 4);
    assert_eq!(svc.completed_count(), 1);
    assert_eq!(svc.reading().humidity, 55.0);
}
