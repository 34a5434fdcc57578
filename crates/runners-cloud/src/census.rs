//! Instance listing and runner counting.
//!
//! # Design
//! - `NameFilter` is pure so counting can be tested without a server.
//! - `InstanceCensus` short-circuits unresolved folders before any request.

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::http::get_json;

/// One instance as returned by the compute API. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstanceRecord {
    /// Instance name.
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct InstanceListing {
    #[serde(default)]
    instances: Option<Vec<InstanceRecord>>,
}

/// Source of the instances of one folder.
#[async_trait]
pub trait InstanceSource: Send + Sync {
    /// List the instances of `folder_id`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the listing call fails.
    async fn list_instances(
        &self,
        folder_id: &str,
        token: &BearerToken,
    ) -> Result<Vec<InstanceRecord>, ApiError>;
}

/// Compute API client.
#[derive(Debug, Clone)]
pub struct ComputeInstancesClient {
    client: Client,
    endpoint: String,
}

impl ComputeInstancesClient {
    /// Construct a client listing instances at `endpoint`.
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl InstanceSource for ComputeInstancesClient {
    async fn list_instances(
        &self,
        folder_id: &str,
        token: &BearerToken,
    ) -> Result<Vec<InstanceRecord>, ApiError> {
        let listing: InstanceListing = get_json(
            &self.client,
            &self.endpoint,
            &[("folder_id", folder_id)],
            token,
        )
        .await
        .inspect_err(|err| {
            if let ApiError::Status { status, body, .. } = err {
                error!(
                    endpoint = %self.endpoint,
                    folder_id,
                    status,
                    body = %body,
                    "instance listing rejected"
                );
            }
        })?;
        Ok(listing.instances.unwrap_or_default())
    }
}

/// Decides which instances count as runners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    substring: String,
    excluded: BTreeSet<String>,
}

impl NameFilter {
    /// Names must contain `substring` and must not equal any `excluded` name.
    #[must_use]
    pub fn new(substring: impl Into<String>, excluded: BTreeSet<String>) -> Self {
        Self {
            substring: substring.into(),
            excluded,
        }
    }

    /// Whether `name` counts. Exclusion wins over inclusion.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.contains(self.substring.as_str()) && !self.excluded.contains(name)
    }

    /// Number of matching instances.
    #[must_use]
    pub fn count(&self, instances: &[InstanceRecord]) -> u64 {
        let matching = instances
            .iter()
            .filter(|instance| self.matches(&instance.name))
            .count();
        u64::try_from(matching).unwrap_or(u64::MAX)
    }
}

/// Counts runners per folder.
#[derive(Debug, Clone)]
pub struct InstanceCensus<S> {
    source: S,
    filter: NameFilter,
}

impl<S> InstanceCensus<S>
where
    S: InstanceSource,
{
    /// Combine an instance source with a name filter.
    #[must_use]
    pub const fn new(source: S, filter: NameFilter) -> Self {
        Self { source, filter }
    }

    /// Count matching instances in a folder.
    ///
    /// Returns `Ok(None)` without calling upstream when the folder id is absent
    /// or empty.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the instance listing fails.
    pub async fn count_matching_instances(
        &self,
        folder_id: Option<&str>,
        folder_name: &str,
        token: &BearerToken,
    ) -> Result<Option<u64>, ApiError> {
        let Some(folder_id) = folder_id.filter(|id| !id.is_empty()) else {
            debug!(folder_name, "folder id unresolved; skipping");
            return Ok(None);
        };
        let instances = self.source.list_instances(folder_id, token).await?;
        Ok(Some(self.filter.count(&instances)))
    }
}
