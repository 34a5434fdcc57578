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

//! Environment-backed configuration for the runners exporter.
//!
//! Layout: `model.rs` (typed settings), `validate.rs` (parsing helpers),
//! `loader.rs` (environment lookup and assembly), `defaults.rs` (fallback values).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{from_env, from_lookup};
pub use model::{
    CloudSettings, ExporterConfig, FilterSettings, ListenerSettings, LoggingSettings,
    ScheduleSettings,
};
