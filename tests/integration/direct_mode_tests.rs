//! Integration tests for the reduced direct mode: rules applied at once,
//! no broker traffic.

use crate::mock_sink::make_service;

use flowerpot::app::commands::AppCommand;
use flowerpot::app::events::SimEvent;
use flowerpot::config::Mode;
use flowerpot::events::LogSource;
use flowerpot::sensors::{SensorField, SensorReading};
use flowerpot::time::Millis;

#[test]
fn dark_pot_switches_light_immediately() {
    let (mut svc, mut sink) = make_service(Mode::Direct);
    svc.handle_command(AppCommand::SetSensor(SensorField::Light, 150.0), Millis(10), &mut sink);

    assert!(svc.status().light_on);
    assert_eq!(svc.status().last_update, Millis(10));
    assert!(svc.broker().trail().is_empty());
    assert!(svc.next_deadline().is_none());
    let entry = svc.log().get(0).expect("flip is logged");
    assert_eq!(entry.source, LogSource::Execution);
    assert!(entry.message.contains("开启补光灯"));
}

#[test]
fn dead_band_reading_changes_nothing() {
    let (mut svc, mut sink) = make_service(Mode::Direct);
    svc.on_sensor_change(SensorReading::new(28.0, 40.0, 400.0), Millis(10), &mut sink);

    assert_eq!(svc.status().last_update, Millis::ZERO);
    assert_eq!(svc.log().len(), 1, "only the sensing entry");
    assert_eq!(svc.log().get(0).map(|e| e.source), Some(LogSource::Sensing));
    assert!(sink.status_changes().is_empty());
}

#[test]
fn switching_to_broker_mode_routes_next_reading() {
    let (mut svc, mut sink) = make_service(Mode::Direct);
    svc.handle_command(AppCommand::SetMode(Mode::Broker), Millis(0), &mut sink);
    svc.handle_command(AppCommand::SetSensor(SensorField::Humidity, 20.0), Millis(10), &mut sink);

    assert!(!svc.status().pump_on);
    assert!(svc.is_busy());
    svc.settle(&mut sink);
    assert!(svc.status().pump_on);
    assert!(sink.events.contains(&SimEvent::ModeChanged { mode: Mode::Broker }));
}

#[test]
fn setting_the_same_mode_is_silent() {
    let (mut svc, mut sink) = make_service(Mode::Direct);
    svc.handle_command(AppCommand::SetMode(Mode::Direct), Millis(0), &mut sink);
    assert!(sink.events.is_empty());
}

#[test]
fn out_of_domain_slider_values_are_clamped() {
    let (mut svc, mut sink) = make_service(Mode::Direct);
    svc.on_sensor_change(SensorReading::new(80.0, -10.0, 5_000.0), Millis(1), &mut sink);

    assert_eq!(svc.reading(), SensorReading::new(50.0, 0.0, 1_000.0));
    let s = svc.status();
    assert!(s.pump_on && s.fan_on && !s.light_on);
}
