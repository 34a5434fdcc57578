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

//! Runners exporter wiring.
//!
//! Layout: `bootstrap.rs` (startup sequence), `poller.rs` (token, folder, and
//! census loop), `server.rs` (`/metrics` and `/health` listener), `error.rs`.

/// Startup sequence and dependency construction.
pub mod bootstrap;
/// Application error type.
pub mod error;
/// Fixed-interval poll loop.
pub mod poller;
/// Metrics HTTP listener.
pub mod server;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
pub use poller::{IterationOutcome, PollState, Poller, RetryPolicy};
