//! Errors raised while constructing a logger
//!
//! Once a `Logger` exists nothing it does is reported back to the caller, so
//! this enum only covers configuration and startup.

use thiserror::Error;

use crate::logging::Severity;

/// Logger construction errors
#[derive(Debug, Error)]
pub enum Error {
    /// Display mode is not one of the recognized names
    #[error("Invalid mode: `{mode}` (expected plain, timestamped, file or detailed)")]
    InvalidMode { mode: String },

    /// `persisted_levels` was supplied but empty
    #[error("persisted_levels must name at least one level, for example [\"ERROR\"]")]
    EmptyPersistedLevels,

    /// `persisted_levels` contains a name that is not a severity
    #[error("Invalid persisted level `{level}`. Valid levels are: {}", valid_levels())]
    UnknownLevel { level: String },

    /// Retention period of zero days
    #[error("retention_days must be at least 1")]
    InvalidRetention,

    /// The persistence thread could not be started
    #[error("Failed to start log writer thread")]
    WorkerSpawn(#[source] std::io::Error),
}

/// Alias for Result with the crate error
pub type Result<T> = std::result::Result<T, Error>;

fn valid_levels() -> String {
    Severity::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
