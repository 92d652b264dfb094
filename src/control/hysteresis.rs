//! Threshold controller with hysteresis for pump, grow light and fan.
//!
//! Each actuator has its own band and is evaluated independently:
//!
//! | Actuator | ON when            | OFF when            | Holds in   |
//! |----------|--------------------|---------------------|------------|
//! | Pump     | humidity < 30      | humidity ≥ 50       | [30, 50)   |
//! | Light    | light < 200        | light > 600         | [200, 600] |
//! | Fan      | temperature > 30   | temperature ≤ 27    | (27, 30]   |
//!
//! (values shown are the [`Thresholds`] defaults)

use crate::config::Thresholds;
use crate::sensors::SensorReading;
use crate::time::Millis;

use super::{Actuator, ActuatorChange, ActuatorStatus, Decision};

/// Pure decision function over fixed thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActuatorController {
    thresholds: Thresholds,
}

impl ActuatorController {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Evaluate every rule against `reading` and `current`.
    ///
    /// Deterministic and side-effect free.  If nothing fires, `next` is
    /// `current` verbatim (including `last_update`); otherwise
    /// `next.last_update == now`.
    pub fn decide(
        &self,
        reading: &SensorReading,
        current: &ActuatorStatus,
        now: Millis,
    ) -> Decision {
        let mut next = *current;
        let mut changes = heapless::Vec::new();

        for actuator in Actuator::ALL {
            if let Some(on) = self.evaluate(actuator, reading, current.is_on(actuator)) {
                next.set(actuator, on);
                // Cannot fail: one push per actuator, MAX_CHANGES slots.
                let _ = changes.push(ActuatorChange::new(actuator, on));
            }
        }

        if !changes.is_empty() {
            next.last_update = now;
        }

        Decision { next, changes }
    }

    /// New state for one actuator, or `None` to hold.
    fn evaluate(&self, actuator: Actuator, r: &SensorReading, is_on: bool) -> Option<bool> {
        let t = &self.thresholds;
        let (turn_on, turn_off) = match actuator {
            Actuator::Pump => (
                r.humidity < t.pump_on_humidity_below,
                r.humidity >= t.pump_off_humidity_at,
            ),
            Actuator::Light => (
                r.light < t.light_on_lux_below,
                r.light > t.light_off_lux_above,
            ),
            Actuator::Fan => (
                r.temperature > t.fan_on_temp_above,
                r.temperature <= t.fan_off_temp_at,
            ),
        };

        match (is_on, turn_on, turn_off) {
            (false, true, _) => Some(true),
            (true, _, true) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Millis = Millis(1_000);
    const NOW: Millis = Millis(5_000);

    fn controller() -> ActuatorController {
        ActuatorController::default()
    }

    fn status(pump: bool, light: bool, fan: bool) -> ActuatorStatus {
        ActuatorStatus {
            pump_on: pump,
            light_on: light,
            fan_on: fan,
            last_update: T0,
        }
    }

    /// Comfortable reading inside every dead band.
    fn calm() -> SensorReading {
        SensorReading::new(28.0, 40.0, 400.0)
    }

    #[test]
    fn dead_band_holds_any_status() {
        for bits in 0..8u8 {
            let current = status(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let d = controller().decide(&calm(), &current, NOW);
            assert!(d.is_noop());
            assert_eq!(d.next, current);
        }
    }

    #[test]
    fn low_humidity_starts_pump() {
        let r = SensorReading { humidity: 29.0, ..calm() };
        let d = controller().decide(&r, &status(false, false, false), NOW);

        assert_eq!(d.changes.len(), 1);
        assert_eq!(d.changes[0].actuator, Actuator::Pump);
        assert!(d.changes[0].on);
        assert_eq!(d.changes[0].message, "检测到低湿度！执行命令：启动水泵浇水");
        assert!(d.next.pump_on);
        assert_eq!(d.next.last_update, NOW);
    }

    #[test]
    fn recovered_humidity_stops_pump() {
        let r = SensorReading { humidity: 50.0, ..calm() };
        let d = controller().decide(&r, &status(true, false, false), NOW);

        assert_eq!(d.changes.len(), 1);
        assert!(!d.changes[0].on);
        assert_eq!(d.changes[0].message, "湿度已恢复，执行命令：停止水泵");
        assert!(!d.next.pump_on);
    }

    #[test]
    fn pump_boundaries() {
        let c = controller();
        let at = |h: f32, on: bool| {
            let r = SensorReading { humidity: h, ..calm() };
            c.decide(&r, &status(on, false, false), NOW).next.pump_on
        };
        // 30 is inside the band: an idle pump stays off.
        assert!(!at(30.0, false));
        assert!(at(29.999, false));
        // 50 stops a running pump, 49.9 does not.
        assert!(!at(50.0, true));
        assert!(at(49.9, true));
    }

    #[test]
    fn light_boundaries() {
        let c = controller();
        let at = |lux: f32, on: bool| {
            let r = SensorReading { light: lux, ..calm() };
            c.decide(&r, &status(false, on, false), NOW).next.light_on
        };
        assert!(!at(200.0, false));
        assert!(at(199.0, false));
        // 600 holds a lit lamp; strictly above turns it off.
        assert!(at(600.0, true));
        assert!(!at(600.5, true));
    }

    #[test]
    fn fan_boundaries() {
        let c = controller();
        let at = |temp: f32, on: bool| {
            let r = SensorReading { temperature: temp, ..calm() };
            c.decide(&r, &status(false, false, on), NOW).next.fan_on
        };
        // 30 holds an idle fan off; strictly above starts it.
        assert!(!at(30.0, false));
        assert!(at(30.5, false));
        // 27 stops a running fan, 27.5 does not.
        assert!(!at(27.0, true));
        assert!(at(27.5, true));
    }

    #[test]
    fn simultaneous_changes_are_ordered_pump_light_fan() {
        let r = SensorReading::new(40.0, 10.0, 50.0);
        let d = controller().decide(&r, &status(false, false, false), NOW);
        let order: Vec<_> = d.changes.iter().map(|c| c.actuator).collect();
        assert_eq!(order, [Actuator::Pump, Actuator::Light, Actuator::Fan]);
    }

    #[test]
    fn second_evaluation_is_idempotent() {
        let r = SensorReading::new(40.0, 10.0, 900.0);
        let c = controller();
        let first = c.decide(&r, &status(false, true, false), NOW);
        assert!(!first.is_noop());

        let second = c.decide(&r, &first.next, Millis(9_000));
        assert!(second.is_noop());
        assert_eq!(second.next, first.next);
        assert_eq!(second.next.last_update, NOW);
    }

    #[test]
    fn nan_reading_fires_nothing() {
        let r = SensorReading::new(f32::NAN, f32::NAN, f32::NAN);
        let current = status(true, false, true);
        assert_eq!(controller().decide(&r, &current, NOW).next, current);
    }

    #[test]
    fn fan_cools_down_below_band() {
        let hot = SensorReading { temperature: 35.0, ..calm() };
        let c = controller();
        let on = c.decide(&hot, &status(false, false, false), NOW);
        assert!(on.next.fan_on);

        let cool = SensorReading { temperature: 26.0, ..calm() };
        let off = c.decide(&cool, &on.next, Millis(8_000));
        assert_eq!(off.changes.len(), 1);
        assert_eq!(off.changes[0].actuator, Actuator::Fan);
        assert!(!off.next.fan_on);
        assert_ne!(off.next.last_update, on.next.last_update);
    }
}
