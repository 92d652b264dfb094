//! Smart flowerpot teaching simulation.
//!
//! A student moves temperature, humidity and light sliders; the simulated
//! IoT platform reacts by switching a pump, a grow light and a fan through a
//! simulated MQTT broker, logging every step.  The library exposes the
//! pure-logic core for rendering front ends and integration tests; the
//! binary drives it with a scripted classroom scenario.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod broker;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod narration;
pub mod ring;
pub mod runtime;
pub mod sensors;
pub mod time;
