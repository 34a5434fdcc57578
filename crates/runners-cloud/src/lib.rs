#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Upstream clients for the runners exporter.
//!
//! Layout:
//! - `auth.rs`: JWT signing and IAM token exchange (`TokenSource`)
//! - `directory.rs`: folder listing and name resolution (`FolderDirectory`)
//! - `census.rs`: instance listing and name filtering (`InstanceSource`)
//! - `endpoints.rs` / `http.rs`: URLs and the shared request helper
//! - `error.rs`: `AuthError` and `ApiError`

pub mod auth;
pub mod census;
pub mod directory;
pub mod endpoints;
pub mod error;
pub mod http;

pub use auth::{AssertionClaims, BearerToken, IamTokenProvider, TokenSource};
pub use census::{ComputeInstancesClient, InstanceCensus, InstanceRecord, InstanceSource, NameFilter};
pub use directory::{FolderDirectory, FolderMap, FolderRecord, ResourceDirectoryClient};
pub use endpoints::Endpoints;
pub use error::{ApiError, AuthError};
