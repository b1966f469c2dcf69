//! Error taxonomy for configuration and acquisition paths.
//!
//! Per-frame update/sample operations never return these: misuse there is a
//! caller contract violation, debug-asserted and fail-soft in release.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MotorError {
    /// Acquisition asked for more slots than the pool has left. Recoverable:
    /// release slots or retry with a smaller count.
    #[error("motor pool exhausted: requested {requested}, available {available}")]
    ResourceExhausted { requested: usize, available: usize },

    /// A stale, released, or foreign handle reached a checked entry point.
    #[error("invalid motor handle")]
    InvalidHandle,

    /// Rejected at configuration time, e.g. a non-monotonic ease window.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
