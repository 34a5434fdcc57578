//! # Design
//!
//! - Only startup and listener failures surface here; poll-cycle failures are
//!   logged and retried inside the loop.
//! - Variants carry an operation tag and the source error without re-logging.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed: {source}")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: runners_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed: {source}")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: runners_telemetry::TelemetryError,
    },
    /// The shared HTTP client could not be built.
    #[error("http client operation failed")]
    HttpClient {
        /// Operation identifier.
        operation: &'static str,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The metrics listener could not bind its address.
    #[error("failed to bind metrics listener on {addr}")]
    Bind {
        /// Address the listener attempted to bind.
        addr: SocketAddr,
        /// Source IO error.
        source: io::Error,
    },
    /// The metrics listener stopped with an error.
    #[error("metrics listener terminated")]
    Serve {
        /// Source IO error.
        source: io::Error,
    },
    /// The metrics listener task panicked or was cancelled.
    #[error("metrics listener task failed")]
    ListenerTask {
        /// Source join error.
        source: tokio::task::JoinError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: runners_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: runners_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn http_client(operation: &'static str, source: reqwest::Error) -> Self {
        Self::HttpClient { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.load",
            runners_config::ConfigError::Missing { name: "CLOUD_ID" },
        );
        assert!(matches!(
            config,
            AppError::Config {
                operation: "config.load",
                ..
            }
        ));
        assert!(config.to_string().contains("CLOUD_ID"));
        assert!(config.source().is_some());

        let Err(utf8) = String::from_utf8(vec![0, 159]) else {
            panic!("expected invalid utf-8");
        };
        let telemetry = AppError::telemetry(
            "telemetry.render",
            runners_telemetry::TelemetryError::MetricsUtf8 { source: utf8 },
        );
        assert!(matches!(telemetry, AppError::Telemetry { .. }));
    }

    #[test]
    fn bind_error_names_the_address() {
        let err = AppError::Bind {
            addr: SocketAddr::from(([0, 0, 0, 0], 9100)),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert_eq!(err.to_string(), "failed to bind metrics listener on 0.0.0.0:9100");
        assert!(err.source().is_some());
    }
}
