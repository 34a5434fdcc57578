//! Folder listing for a cloud.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::http::get_json;

/// Folder name to folder id. `None` (or an empty id) marks an unresolved folder.
pub type FolderMap = BTreeMap<String, Option<String>>;

/// One folder as returned by the resource manager.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FolderRecord {
    /// Human-readable folder name.
    pub name: String,
    /// Opaque folder id.
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FolderListing {
    #[serde(default)]
    folders: Vec<FolderRecord>,
}

/// Source of the folder map.
#[async_trait]
pub trait FolderDirectory: Send + Sync {
    /// List every folder of the configured cloud.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the listing call fails.
    async fn list_folders(&self, token: &BearerToken) -> Result<FolderMap, ApiError>;
}

/// Resource-manager client scoped to one cloud.
#[derive(Debug, Clone)]
pub struct ResourceDirectoryClient {
    client: Client,
    endpoint: String,
    cloud_id: String,
}

impl ResourceDirectoryClient {
    /// Construct a client listing folders of `cloud_id` at `endpoint`.
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>, cloud_id: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            cloud_id: cloud_id.into(),
        }
    }

    /// Fetch the raw folder records.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for transport failures, non-success statuses, or
    /// undecodable bodies.
    pub async fn fetch_folders(&self, token: &BearerToken) -> Result<Vec<FolderRecord>, ApiError> {
        let listing: FolderListing = get_json(
            &self.client,
            &self.endpoint,
            &[("cloud_id", self.cloud_id.as_str())],
            token,
        )
        .await
        .inspect_err(|err| {
            if let ApiError::Status { status, body, .. } = err {
                error!(
                    endpoint = %self.endpoint,
                    cloud_id = %self.cloud_id,
                    status,
                    body = %body,
                    "folder listing rejected"
                );
            }
        })?;
        Ok(listing.folders)
    }

    /// Look up a single folder id by name with a fresh listing.
    ///
    /// Returns `Ok(None)` when no folder carries that name.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the listing call fails.
    pub async fn resolve_folder_id(
        &self,
        name: &str,
        token: &BearerToken,
    ) -> Result<Option<String>, ApiError> {
        let folders = self.fetch_folders(token).await?;
        Ok(folders
            .into_iter()
            .find(|folder| folder.name == name)
            .and_then(|folder| folder.id))
    }
}

#[async_trait]
impl FolderDirectory for ResourceDirectoryClient {
    async fn list_folders(&self, token: &BearerToken) -> Result<FolderMap, ApiError> {
        let folders = self.fetch_folders(token).await?;
        Ok(into_folder_map(folders))
    }
}

/// Build a folder map; the first record wins when names repeat.
fn into_folder_map(folders: Vec<FolderRecord>) -> FolderMap {
    let mut map = FolderMap::new();
    for folder in folders {
        map.entry(folder.name).or_insert(folder.id);
    }
    map
}
