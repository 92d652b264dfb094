//! Host time adapter.
//!
//! Provides monotonic simulation time from `std::time::Instant`, measured
//! from the moment the clock was created.

use std::time::Instant;

use crate::app::ports::Clock;
use crate::time::Millis;

pub struct HostClock {
    start: Instant,
}

impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// The `Instant` at which `at` falls on this clock.
    pub fn instant_of(&self, at: Millis) -> Instant {
        self.start + std::time::Duration::from_millis(at.as_u64())
    }
}

impl Clock for HostClock {
    fn now(&self) -> Millis {
        Millis::from(self.start.elapsed())
    }
}
