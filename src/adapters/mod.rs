//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                      |
//! |------------|---------------|----------------------------------|
//! | `gemini`   | NarrationPort | Gemini generateContent over HTTPS|
//! | `log_sink` | EventSink     | `log` facade output              |
//! | `time`     | Clock         | `std::time::Instant`             |
//!
//! `gemini` is only built with the `gemini` feature.

#[cfg(feature = "gemini")]
pub mod gemini;
pub mod log_sink;
pub mod time;
