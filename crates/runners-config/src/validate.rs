//! Validation helpers and parsing utilities for raw environment values.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};

/// Require a non-blank value, returning it trimmed.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] when the value is absent and
/// [`ConfigError::Invalid`] when it is blank.
pub fn require_text(name: &'static str, raw: Option<String>) -> ConfigResult<String> {
    let value = raw.ok_or(ConfigError::Missing { name })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid {
            name,
            value,
            reason: "must not be empty",
        });
    }
    Ok(trimmed.to_string())
}

/// Parse a strictly positive number of seconds.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] when the value is absent and
/// [`ConfigError::Invalid`] when it is not a positive integer.
pub fn parse_seconds(name: &'static str, raw: Option<String>) -> ConfigResult<Duration> {
    let value = raw.ok_or(ConfigError::Missing { name })?;
    let seconds = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
            reason: "must be a whole number of seconds",
        })?;
    if seconds == 0 {
        return Err(ConfigError::Invalid {
            name,
            value,
            reason: "must be at least 1 second",
        });
    }
    Ok(Duration::from_secs(seconds))
}

/// Parse a TCP port in the range 1-65535.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] when the value is absent and
/// [`ConfigError::Invalid`] when it is not an integer in range.
pub fn parse_port(name: &'static str, raw: Option<String>) -> ConfigResult<u16> {
    let value = raw.ok_or(ConfigError::Missing { name })?;
    let port = value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
            reason: "must be an integer",
        })?;
    if !(1..=65_535).contains(&port) {
        return Err(ConfigError::Invalid {
            name,
            value,
            reason: "must be between 1 and 65535",
        });
    }
    u16::try_from(port).map_err(|_| ConfigError::Invalid {
        name,
        value,
        reason: "must be between 1 and 65535",
    })
}

/// Parse a comma-separated list of exact names.
///
/// The variable must be present but may be empty; entries are trimmed and
/// blank entries dropped.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] when the value is absent.
pub fn parse_name_list(name: &'static str, raw: Option<String>) -> ConfigResult<BTreeSet<String>> {
    let value = raw.ok_or(ConfigError::Missing { name })?;
    Ok(value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect())
}

/// Normalise an optional log format selector.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for anything other than `json` or `pretty`.
pub fn parse_log_format(name: &'static str, raw: Option<String>) -> ConfigResult<Option<String>> {
    let Some(value) = raw else {
        return Ok(None);
    };
    let normalised = value.trim().to_ascii_lowercase();
    match normalised.as_str() {
        "" => Ok(None),
        "json" | "pretty" => Ok(Some(normalised)),
        _ => Err(ConfigError::Invalid {
            name,
            value,
            reason: "must be `json` or `pretty`",
        }),
    }
}
