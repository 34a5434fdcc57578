//! Error types for configuration loading.

use thiserror::Error;

/// Primary error type for configuration loading.
///
/// Every variant is fatal: the exporter refuses to start when one is raised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable was not set.
    #[error("required environment variable {name} is not set")]
    Missing {
        /// Name of the missing variable.
        name: &'static str,
    },
    /// An environment variable held a value that failed validation.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Name of the offending variable.
        name: &'static str,
        /// Offending value as provided.
        value: String,
        /// Human-readable reason for the failure.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Name of the environment variable tied to the failure.
    #[must_use]
    pub const fn variable(&self) -> &'static str {
        match self {
            Self::Missing { name } | Self::Invalid { name, .. } => name,
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
