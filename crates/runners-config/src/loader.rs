//! Environment lookup and configuration assembly.
//!
//! # Design
//! - All required variables are validated eagerly, before anything else starts.
//! - Lookups go through a closure so tests never mutate the process environment.

use std::path::PathBuf;

use crate::defaults;
use crate::error::ConfigResult;
use crate::model::{
    CloudSettings, ExporterConfig, FilterSettings, ListenerSettings, LoggingSettings,
    ScheduleSettings,
};
use crate::validate::{
    parse_log_format, parse_name_list, parse_port, parse_seconds, require_text,
};

/// Cloud whose folders are enumerated.
pub const ENV_CLOUD_ID: &str = "CLOUD_ID";
/// Service account issuing the JWT.
pub const ENV_SERVICE_ACCOUNT_ID: &str = "SERVICE_ACCOUNT_ID";
/// Authorized key identifier.
pub const ENV_KEY_ID: &str = "KEY_ID";
/// Scrape interval in seconds.
pub const ENV_SCRAPE_TIMEOUT: &str = "SCRAPE_TIMEOUT";
/// Token validity window in seconds.
pub const ENV_TOKEN_TTL: &str = "TOKEN_TTL";
/// Substring an instance name must contain.
pub const ENV_SUBSTRING_IN_VM_NAME: &str = "SUBSTRING_IN_VM_NAME";
/// Comma-separated instance names that are never counted.
pub const ENV_BLACKLIST_VM_NAMES: &str = "BLACKLIST_VM_NAMES";
/// Metrics listener port.
pub const ENV_PORT: &str = "PORT";
/// Optional override for the private key location.
pub const ENV_PRIVATE_KEY_PATH: &str = "PRIVATE_KEY_PATH";
/// Optional override for the public API domain.
pub const ENV_API_DOMAIN: &str = "API_DOMAIN";
/// Optional log format selector.
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Load the configuration from the process environment.
///
/// # Errors
///
/// Returns the first [`ConfigError`](crate::ConfigError) encountered while
/// validating the required variables.
pub fn from_env() -> ConfigResult<ExporterConfig> {
    from_lookup(|name| std::env::var(name).ok())
}

/// Load the configuration through an arbitrary lookup function.
///
/// # Errors
///
/// Returns the first [`ConfigError`](crate::ConfigError) encountered while
/// validating the required variables.
pub fn from_lookup<F>(lookup: F) -> ConfigResult<ExporterConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let cloud = CloudSettings {
        cloud_id: require_text(ENV_CLOUD_ID, lookup(ENV_CLOUD_ID))?,
        service_account_id: require_text(ENV_SERVICE_ACCOUNT_ID, lookup(ENV_SERVICE_ACCOUNT_ID))?,
        key_id: require_text(ENV_KEY_ID, lookup(ENV_KEY_ID))?,
        private_key_path: optional_text(&lookup, ENV_PRIVATE_KEY_PATH)
            .map_or_else(|| PathBuf::from(defaults::PRIVATE_KEY_PATH), PathBuf::from),
        api_domain: optional_text(&lookup, ENV_API_DOMAIN)
            .unwrap_or_else(|| defaults::API_DOMAIN.to_string()),
    };

    let schedule = ScheduleSettings {
        scrape_interval: parse_seconds(ENV_SCRAPE_TIMEOUT, lookup(ENV_SCRAPE_TIMEOUT))?,
        token_ttl: parse_seconds(ENV_TOKEN_TTL, lookup(ENV_TOKEN_TTL))?,
    };

    let filter = FilterSettings {
        name_substring: require_text(ENV_SUBSTRING_IN_VM_NAME, lookup(ENV_SUBSTRING_IN_VM_NAME))?,
        excluded_names: parse_name_list(ENV_BLACKLIST_VM_NAMES, lookup(ENV_BLACKLIST_VM_NAMES))?,
    };

    let listener = ListenerSettings {
        port: parse_port(ENV_PORT, lookup(ENV_PORT))?,
    };

    let logging = LoggingSettings {
        format: parse_log_format(ENV_LOG_FORMAT, lookup(ENV_LOG_FORMAT))?,
    };

    Ok(ExporterConfig {
        cloud,
        schedule,
        filter,
        listener,
        logging,
    })
}

fn optional_text<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
