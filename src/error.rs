//! Error types for configuration, lifecycle, and measurement failures.

use thiserror::Error;

/// Errors surfaced by the sysload public API.
#[derive(Debug, Error)]
pub enum Error {
    /// Construction received an unknown preset or a malformed slot table.
    #[error("invalid time slot configuration: {0}")]
    InvalidConfig(String),

    /// `start` was called while continuous measurement is in progress.
    #[error("continuous measurement already in progress (stop first)")]
    AlreadyRunning,

    /// `stop` or `average` was called before `start`.
    #[error("continuous measurement not started (start first)")]
    NotRunning,

    /// The CPU time source could not be read or parsed.
    #[error("failed to read CPU times: {0}")]
    CpuTimes(#[from] std::io::Error),
}
