//! Shared HTTP client construction and response handling.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::auth::BearerToken;
use crate::error::ApiError;

/// Upper bound on any single upstream call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the client shared by every upstream call.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("runners-exporter/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Issue an authenticated GET with the given query parameters and decode the JSON body.
pub(crate) async fn get_json<T>(
    client: &Client,
    endpoint: &str,
    query: &[(&str, &str)],
    token: &BearerToken,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let request = client
        .get(endpoint)
        .query(query)
        .bearer_auth(token.expose());
    send_json(endpoint, request).await
}

/// Send a prepared request and decode a successful JSON body.
///
/// A non-success status is returned as [`ApiError::Status`] before any attempt
/// to parse the body.
pub(crate) async fn send_json<T>(endpoint: &str, request: RequestBuilder) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let response = request.send().await.map_err(|source| ApiError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;
    let status = response.status();
    let body = response.text().await.map_err(|source| ApiError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;

    if !status.is_success() {
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
