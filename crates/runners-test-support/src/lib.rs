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

//! Shared test helpers used across the exporter's test suites.
//! Layout: keys.rs (RSA key pair), fixtures.rs (env and upstream payloads),
//! metrics.rs (exposition parsing for assertions).

pub mod fixtures;
pub mod keys;
pub mod metrics;
