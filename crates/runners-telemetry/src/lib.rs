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

//! Telemetry primitives for the runners exporter.
//!
//! Layout: `init.rs` (tracing subscriber), `metrics.rs` (Prometheus registry and
//! the `runner_up` gauge), `context.rs` (application and cycle spans),
//! `error.rs` (`TelemetryError`), `report.rs` (error chains for log fields).

pub mod context;
pub mod error;
pub mod init;
pub mod metrics;
pub mod report;

pub use context::{GlobalContextGuard, cycle_span};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use metrics::{Metrics, RUNNER_UP};
pub use report::ReportExt;
