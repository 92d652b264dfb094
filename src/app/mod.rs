//! Application core: pure simulation logic, zero I/O.
//!
//! This module contains the orchestration rules for the flowerpot:
//! sensor changes in, broker round trips, actuator decisions and the
//! event log out.  All interaction with the outside world happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without a clock, terminal or network.

pub mod choreography;
pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
