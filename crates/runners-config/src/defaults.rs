//! Fallback values for optional settings.

/// Location of the service-account private key when `PRIVATE_KEY_PATH` is unset.
pub const PRIVATE_KEY_PATH: &str = "private_key/private_key";
/// Public API domain used to derive the IAM, resource-manager, and compute hosts.
pub const API_DOMAIN: &str = "api.cloud.yandex.net";
