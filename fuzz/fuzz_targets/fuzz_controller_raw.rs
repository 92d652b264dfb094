//! Fuzz target: `ActuatorController::decide`
//!
//! Feeds raw f32 bit patterns (NaN, infinities, subnormals) straight into
//! the controller, bypassing the clamp, and checks that a decision is
//! always idempotent and never lists an actuator twice.
//!
//! cargo fuzz run fuzz_controller_raw

#![no_main]

use flowerpot::config::Thresholds;
use flowerpot::control::{ActuatorController, ActuatorStatus};
use flowerpot::sensors::SensorReading;
use flowerpot::time::Millis;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some(bytes) = data.get(..13) else {
        return;
    };
    let f = |i: usize| f32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    let reading = SensorReading::new(f(0), f(4), f(8));

    let mut status = ActuatorStatus::all_off(Millis::ZERO);
    status.pump_on = bytes[12] & 1 != 0;
    status.light_on = bytes[12] & 2 != 0;
    status.fan_on = bytes[12] & 4 != 0;

    let controller = ActuatorController::new(Thresholds::default());
    let first = controller.decide(&reading, &status, Millis(1));
    assert!(first.changes.windows(2).all(|w| w[0].actuator < w[1].actuator));

    let second = controller.decide(&reading, &first.next, Millis(2));
    assert!(second.is_noop());
});
