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

//! Binary entrypoint for the runners exporter.

use runners_app::{AppResult, run_app};

/// Loads configuration, starts the metrics listener, and polls until killed.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
