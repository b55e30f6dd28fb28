//! Prometheus metrics for observability.
//!
//! This module provides metric registration and exposure for the state
//! layer:
//! - Store updates, rejections, and subscriber counts
//! - Subscriber notification panics
//! - Loader runs, ticks, stops, and cancellations
//!
//! # Example
//!
//! ```rust,no_run
//! use flightdeck_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = MetricsExporter::new();
//! exporter.install()?;
//!
//! // Later, e.g. from an HTTP handler:
//! let body = exporter.render().unwrap_or_default();
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics recorder.
///
/// Installs the process-wide recorder and renders current metrics in the
/// Prometheus exposition format for whatever transport the embedding
/// application uses.
#[derive(Default)]
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for MetricsExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsExporter")
            .field("handle", &self.handle.as_ref().map(|_| "PrometheusHandle"))
            .finish()
    }
}

impl MetricsExporter {
    /// Create an exporter; no recorder is installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the recorder.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Install`] if a different recorder is already
    /// installed. A recorder previously installed by this module is reused
    /// with a warning, so tests creating several exporters keep working.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!(
                        "Metrics recorder already initialized, skipping re-initialization"
                    );
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the recorder hasn't been installed.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store metrics
    describe_counter!(
        "store.updates.total",
        "Total number of accepted update batches, per store"
    );
    describe_counter!(
        "store.updates.rejected",
        "Total number of rejected update batches, per store"
    );
    describe_gauge!(
        "store.subscribers",
        "Number of currently registered subscribers, per store"
    );
    describe_counter!(
        "store.notify.panics",
        "Total number of subscriber callbacks that panicked during notification"
    );

    // Loader metrics
    describe_counter!("loader.runs", "Total number of loader runs started");
    describe_counter!("loader.ticks", "Total number of loader progress ticks");
    describe_counter!("loader.stopped", "Total number of loader stop requests");
    describe_counter!(
        "loader.cancelled",
        "Total number of loader runs cancelled before completion"
    );
}
