//! Prometheus-backed metrics registry.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - The registry synchronises concurrent scrapes and gauge updates internally;
//!   callers add no locking of their own.
//! - Gauge values are overwritten on every publish, never accumulated. Labels for
//!   folders that disappear upstream are kept.

use std::sync::Arc;

use prometheus::{Encoder, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::error::{Result, TelemetryError};

/// Name of the per-folder runner gauge.
pub const RUNNER_UP: &str = "runner_up";

/// Prometheus-backed metrics registry shared between the poll loop and the listener.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    runner_up: IntGaugeVec,
}

impl Metrics {
    /// Construct a new registry with the `runner_up` gauge registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the collector cannot be built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let runner_up = IntGaugeVec::new(
            Opts::new(RUNNER_UP, "Runner up now"),
            &["folder_name", "folder_id"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: RUNNER_UP,
            source,
        })?;

        registry
            .register(Box::new(runner_up.clone()))
            .map_err(|source| TelemetryError::MetricsRegister {
                name: RUNNER_UP,
                source,
            })?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                runner_up,
            }),
        })
    }

    /// Publish the number of matching instances for a folder.
    pub fn set_runner_count(&self, folder_name: &str, folder_id: &str, count: u64) {
        self.inner
            .runner_up
            .with_label_values(&[folder_name, folder_id])
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Content type advertised for [`Metrics::render`] output.
    #[must_use]
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}
