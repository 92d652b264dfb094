//! Unified error types for the flowerpot simulation.
//!
//! The control core itself is total; only configuration checks and the
//! optional narration collaborator can fail.  Both funnel into [`Error`] so
//! the binary's top level handles them uniformly.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid.
    Config(ConfigError),
    /// The narration collaborator failed.
    Narration(NarrationError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Narration(e) => write!(f, "narration: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Narration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationError {
    /// No credentials configured.
    MissingApiKey,
    /// Connection, DNS or timeout failure.
    Network(String),
    /// The service rejected the credentials.
    Auth,
    /// The service refused due to rate limits or quota.
    Quota,
    /// The response could not be understood.
    InvalidResponse(String),
}

impl fmt::Display for NarrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "API key not configured"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Auth => write!(f, "authentication rejected"),
            Self::Quota => write!(f, "quota exhausted"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for NarrationError {}

impl From<NarrationError> for Error {
    fn from(e: NarrationError) -> Self {
        Self::Narration(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
