//! Fuzz target: `FlowerpotService` under arbitrary input timing
//!
//! Each 8-byte chunk is one event: a time gap, an opcode and a value.
//! Readings, single-slider moves, mode switches and bare clock advances
//! are interleaved; the bounded stores must stay bounded and the round
//! trip must always settle.
//!
//! cargo fuzz run fuzz_sensor_sequence

#![no_main]

use flowerpot::app::commands::AppCommand;
use flowerpot::app::service::FlowerpotService;
use flowerpot::broker::MESSAGE_TRAIL_CAP;
use flowerpot::config::{Mode, SimConfig};
use flowerpot::events::EVENT_LOG_CAP;
use flowerpot::sensors::SensorField;
use flowerpot::time::Millis;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut svc) = FlowerpotService::new(SimConfig::default(), Millis::ZERO) else {
        return;
    };
    let mut now = 0u64;

    for chunk in data.chunks_exact(8) {
        now += u64::from(u16::from_le_bytes([chunk[0], chunk[1]]));
        let value = f32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
        let at = Millis(now);

        let field = match chunk[2] % 5 {
            0 => SensorField::Temperature,
            1 => SensorField::Humidity,
            2 => SensorField::Light,
            3 => {
                let mode = if chunk[3] & 1 == 0 { Mode::Broker } else { Mode::Direct };
                svc.handle_command(AppCommand::SetMode(mode), at, &mut ());
                continue;
            }
            _ => {
                svc.advance(at, &mut ());
                continue;
            }
        };
        svc.handle_command(AppCommand::SetSensor(field, value), at, &mut ());

        assert!(svc.log().len() <= EVENT_LOG_CAP);
        assert!(svc.broker().trail().len() <= MESSAGE_TRAIL_CAP);
    }

    svc.settle(&mut ());
    assert!(!svc.is_busy());
});
