//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one slice of the
//! simulation against a recording sink.  Everything runs with explicit
//! timestamps; no test sleeps.

mod broker_flow_tests;
mod cancellation_tests;
mod direct_mode_tests;
mod mock_sink;
