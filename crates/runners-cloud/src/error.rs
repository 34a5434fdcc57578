//! # Design
//!
//! - `AuthError` covers everything that can go wrong while obtaining a token.
//! - `ApiError` covers authenticated listing calls; token exchange reuses it for
//!   the HTTP leg.
//! - Messages carry the endpoint, status, and body so a single log line is
//!   enough to diagnose an upstream failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of an upstream HTTP call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read (includes timeouts).
    #[error("request to {endpoint} failed")]
    Transport {
        /// Endpoint the request targeted, without query parameters.
        endpoint: String,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The upstream answered with a non-success status.
    #[error("{endpoint} returned status {status}: {body}")]
    Status {
        /// Endpoint the request targeted, without query parameters.
        endpoint: String,
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body as text.
        body: String,
    },
    /// The response body was not the expected JSON document.
    #[error("unexpected response body from {endpoint}")]
    Decode {
        /// Endpoint the request targeted, without query parameters.
        endpoint: String,
        /// Source decoding error.
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status carried by the error, when the upstream answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Failure while acquiring an IAM token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The private key file could not be read.
    #[error("failed to read private key {}", .path.display())]
    KeyRead {
        /// Location of the key file.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The private key was not a usable RSA PEM document.
    #[error("private key {} is not a valid RSA PEM key", .path.display())]
    KeyParse {
        /// Location of the key file.
        path: PathBuf,
        /// Source key parsing error.
        source: jsonwebtoken::errors::Error,
    },
    /// Signing the JWT assertion failed.
    #[error("failed to sign JWT assertion")]
    Sign {
        /// Source signing error.
        source: jsonwebtoken::errors::Error,
    },
    /// Exchanging the assertion for a token failed.
    #[error("token exchange failed")]
    Exchange {
        /// Source upstream error.
        #[from]
        source: ApiError,
    },
    /// The exchange succeeded but the response carried no token.
    #[error("{endpoint} response did not contain an iamToken")]
    MissingToken {
        /// Token exchange endpoint.
        endpoint: String,
    },
}
