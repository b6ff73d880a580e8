//! Configuration errors.
//!
//! The simulation itself has no failure modes; only loading and checking a
//! parameter bundle can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse parameters: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid parameter `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Shorthand result type for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;
