//! Environment and upstream payload fixtures.

use std::collections::HashMap;

use serde_json::{Value, json};

/// Complete set of required environment variables with plausible values.
#[must_use]
pub fn exporter_env() -> HashMap<&'static str, String> {
    HashMap::from([
        ("CLOUD_ID", "b1gtestcloud".to_string()),
        ("SERVICE_ACCOUNT_ID", "ajetestaccount".to_string()),
        ("KEY_ID", "ajetestkey".to_string()),
        ("SCRAPE_TIMEOUT", "30".to_string()),
        ("TOKEN_TTL", "3600".to_string()),
        ("SUBSTRING_IN_VM_NAME", "runner".to_string()),
        ("BLACKLIST_VM_NAMES", "runner-broken".to_string()),
        ("PORT", "9100".to_string()),
    ])
}

/// Token exchange response body.
#[must_use]
pub fn token_body(token: &str) -> Value {
    json!({ "iamToken": token, "expiresAt": "2030-01-01T00:00:00Z" })
}

/// Folder listing body built from `(name, id)` pairs.
#[must_use]
pub fn folders_body(folders: &[(&str, &str)]) -> Value {
    let folders = folders
        .iter()
        .map(|(name, id)| json!({ "id": id, "name": name, "status": "ACTIVE" }))
        .collect::<Vec<_>>();
    json!({ "folders": folders })
}

/// Instance listing body built from instance names.
///
/// An empty slice yields `{}`, matching what the compute API returns for a
/// folder without instances.
#[must_use]
pub fn instances_body(names: &[&str]) -> Value {
    if names.is_empty() {
        return json!({});
    }
    let instances = names
        .iter()
        .enumerate()
        .map(|(index, name)| json!({ "id": format!("fhm{index}"), "name": name, "status": "RUNNING" }))
        .collect::<Vec<_>>();
    json!({ "instances": instances })
}
