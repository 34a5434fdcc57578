//! Upstream endpoint URLs.

/// URLs of the three upstream APIs the exporter calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// IAM token exchange; also the JWT audience.
    pub token: String,
    /// Resource-manager folder listing.
    pub folders: String,
    /// Compute instance listing.
    pub instances: String,
}

impl Endpoints {
    /// Derive the production URLs from the public API domain.
    #[must_use]
    pub fn for_domain(domain: &str) -> Self {
        let domain = domain.trim_matches('/');
        Self {
            token: format!("https://iam.{domain}/iam/v1/tokens"),
            folders: format!("https://resource-manager.{domain}/resource-manager/v1/folders"),
            instances: format!("https://compute.{domain}/compute/v1/instances"),
        }
    }

    /// Serve every API from a single base URL (mock servers, proxies).
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            token: format!("{base}/iam/v1/tokens"),
            folders: format!("{base}/resource-manager/v1/folders"),
            instances: format!("{base}/compute/v1/instances"),
        }
    }
}
