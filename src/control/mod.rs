//! Actuator control: status model and the hysteresis decision function.
//!
//! ```text
//!  SensorReading ─┐
//!                 ├──▶ ActuatorController::decide ──▶ Decision { next, changes }
//!  ActuatorStatus ┘
//! ```

pub mod hysteresis;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::time::Millis;

pub use hysteresis::ActuatorController;

/// Most changes a single evaluation can produce (one per actuator).
pub const MAX_CHANGES: usize = 3;

const _: () = assert!(MAX_CHANGES == Actuator::ALL.len());

// ---------------------------------------------------------------------------
// Actuator identity
// ---------------------------------------------------------------------------

/// The three actuators of the pot.  Declaration order is the output order of
/// every change list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    Pump,
    Light,
    Fan,
}

impl Actuator {
    pub const ALL: [Self; 3] = [Self::Pump, Self::Light, Self::Fan];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Light => "light",
            Self::Fan => "fan",
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// On/off state of every actuator plus the time of the last flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorStatus {
    pub pump_on: bool,
    pub light_on: bool,
    pub fan_on: bool,
    /// Advances only when at least one boolean actually flips.
    pub last_update: Millis,
}

impl ActuatorStatus {
    /// All actuators off.
    pub const fn all_off(at: Millis) -> Self {
        Self {
            pump_on: false,
            light_on: false,
            fan_on: false,
            last_update: at,
        }
    }

    pub fn is_on(&self, actuator: Actuator) -> bool {
        match actuator {
            Actuator::Pump => self.pump_on,
            Actuator::Light => self.light_on,
            Actuator::Fan => self.fan_on,
        }
    }

    fn set(&mut self, actuator: Actuator, on: bool) {
        match actuator {
            Actuator::Pump => self.pump_on = on,
            Actuator::Light => self.light_on = on,
            Actuator::Fan => self.fan_on = on,
        }
    }

    /// Set exactly the actuators named in `commands`.
    ///
    /// Returns the changes that actually flipped a boolean, in Pump, Light,
    /// Fan order.  `last_update` moves to `now` only if that list is
    /// non-empty.
    pub fn apply(
        &mut self,
        commands: &CommandSet,
        now: Millis,
    ) -> heapless::Vec<ActuatorChange, MAX_CHANGES> {
        let mut flipped = heapless::Vec::new();
        for (actuator, on) in commands.iter() {
            if self.is_on(actuator) != on {
                self.set(actuator, on);
                // Cannot fail: a CommandSet names each actuator at most once.
                let _ = flipped.push(ActuatorChange::new(actuator, on));
            }
        }
        if !flipped.is_empty() {
            self.last_update = now;
        }
        flipped
    }
}

// ---------------------------------------------------------------------------
// Changes and decisions
// ---------------------------------------------------------------------------

/// One fired rule: which actuator, its new state, and the log text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActuatorChange {
    pub actuator: Actuator,
    pub on: bool,
    pub message: &'static str,
}

impl ActuatorChange {
    pub fn new(actuator: Actuator, on: bool) -> Self {
        Self {
            actuator,
            on,
            message: change_message(actuator, on),
        }
    }
}

/// Fixed log text for every (actuator, new state) pair.
pub fn change_message(actuator: Actuator, on: bool) -> &'static str {
    match (actuator, on) {
        (Actuator::Pump, true) => "检测到低湿度！执行命令：启动水泵浇水",
        (Actuator::Pump, false) => "湿度已恢复，执行命令：停止水泵",
        (Actuator::Light, true) => "检测到光照不足！执行命令：开启补光灯",
        (Actuator::Light, false) => "光照已充足，执行命令：关闭补光灯",
        (Actuator::Fan, true) => "检测到高温环境！执行命令：开启散热风扇",
        (Actuator::Fan, false) => "温度已下降，执行命令：关闭散热风扇",
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub next: ActuatorStatus,
    /// Fired rules, ordered Pump, Light, Fan.
    pub changes: heapless::Vec<ActuatorChange, MAX_CHANGES>,
}

impl Decision {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    /// The command map the platform would publish for this decision.
    pub fn commands(&self) -> CommandSet {
        CommandSet::from_changes(&self.changes)
    }
}

// ---------------------------------------------------------------------------
// Command map
// ---------------------------------------------------------------------------

/// Actuator → desired state, as published on the `commands` topic.
///
/// Serialises as a JSON object, e.g. `{"pump":true,"fan":false}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandSet(BTreeMap<Actuator, bool>);

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_changes(changes: &[ActuatorChange]) -> Self {
        Self(changes.iter().map(|c| (c.actuator, c.on)).collect())
    }

    pub fn insert(&mut self, actuator: Actuator, on: bool) {
        self.0.insert(actuator, on);
    }

    pub fn get(&self, actuator: Actuator) -> Option<bool> {
        self.0.get(&actuator).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Entries in Pump, Light, Fan order.
    pub fn iter(&self) -> impl Iterator<Item = (Actuator, bool)> + '_ {
        self.0.iter().map(|(a, on)| (*a, *on))
    }
}
