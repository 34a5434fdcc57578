//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers assembled by the loader and consumed by the app.
//! - Values are validated before construction, so consumers never re-check them.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// Fully validated exporter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Cloud account and service-account credentials.
    pub cloud: CloudSettings,
    /// Poll cadence and token validity.
    pub schedule: ScheduleSettings,
    /// Instance name filter.
    pub filter: FilterSettings,
    /// Metrics listener settings.
    pub listener: ListenerSettings,
    /// Log output settings.
    pub logging: LoggingSettings,
}

/// Identity of the cloud account and the service account used to query it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudSettings {
    /// Cloud whose folders are enumerated.
    pub cloud_id: String,
    /// Service account that issues the JWT (`iss` claim).
    pub service_account_id: String,
    /// Identifier of the authorized key (`kid` header).
    pub key_id: String,
    /// Filesystem location of the PEM-encoded private key.
    pub private_key_path: PathBuf,
    /// Public API domain, e.g. `api.cloud.yandex.net`.
    pub api_domain: String,
}

/// Poll cadence settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    /// Delay between scrape cycles.
    pub scrape_interval: Duration,
    /// How long an IAM token is reused before it is requested again.
    pub token_ttl: Duration,
}

/// Instance name filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSettings {
    /// Substring an instance name must contain to be counted.
    pub name_substring: String,
    /// Exact instance names that are never counted.
    pub excluded_names: BTreeSet<String>,
}

/// Metrics listener settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSettings {
    /// TCP port the metrics endpoint binds to on all interfaces.
    pub port: u16,
}

/// Log output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Requested output format (`json` or `pretty`); `None` lets the build decide.
    pub format: Option<String>,
}
